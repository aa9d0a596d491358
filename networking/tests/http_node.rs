use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use containers::{ForkName, RawBlock, VersionedSignedBlock, fixtures};
use networking::{BeaconNode, BlockId, HttpBeaconNode, NodeError};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Default)]
struct FakeNode {
    blocks: HashMap<String, RawBlock>,
    head_slot: u64,
    validator_requests: AtomicUsize,
    spec_requests: AtomicUsize,
}

async fn block(State(node): State<Arc<FakeNode>>, Path(id): Path<String>) -> Response {
    match id.as_str() {
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, "node overloaded").into_response(),
        "13" => (StatusCode::OK, "{not json").into_response(),
        _ => match node.blocks.get(&id) {
            Some(raw) => Json(json!({
                "version": raw.version,
                "execution_optimistic": false,
                "finalized": true,
                "data": raw.data,
            }))
            .into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "code": 404, "message": "NOT_FOUND: beacon block" })),
            )
                .into_response(),
        },
    }
}

async fn head(State(node): State<Arc<FakeNode>>) -> Response {
    let zero = format!("0x{}", "00".repeat(32));
    Json(json!({
        "data": {
            "root": zero,
            "canonical": true,
            "header": {
                "message": {
                    "slot": node.head_slot.to_string(),
                    "proposer_index": "1",
                    "parent_root": zero,
                    "state_root": zero,
                    "body_root": zero,
                },
                "signature": format!("0x{}", "00".repeat(96)),
            }
        }
    }))
    .into_response()
}

async fn spec(State(node): State<Arc<FakeNode>>) -> Response {
    node.spec_requests.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "data": {
            "SLOTS_PER_EPOCH": "32",
            "SECONDS_PER_SLOT": "12",
            "BLOB_SCHEDULE": [{ "EPOCH": "1", "MAX_BLOBS_PER_BLOCK": "9" }],
        }
    }))
    .into_response()
}

async fn validators(State(node): State<Arc<FakeNode>>) -> Response {
    node.validator_requests.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "data": [{
            "index": "0",
            "balance": "32000000000",
            "status": "active_ongoing",
            "validator": {
                "pubkey": format!("0x{}", "aa".repeat(48)),
                "withdrawal_credentials": format!("0x{}", "00".repeat(32)),
                "effective_balance": "32000000000",
                "slashed": false,
                "activation_eligibility_epoch": "0",
                "activation_epoch": "0",
                "exit_epoch": "18446744073709551615",
                "withdrawable_epoch": "18446744073709551615",
            }
        }]
    }))
    .into_response()
}

async fn serve(node: Arc<FakeNode>) -> SocketAddr {
    let app = Router::new()
        .route("/eth/v2/beacon/blocks/:id", get(block))
        .route("/eth/v1/beacon/headers/head", get(head))
        .route("/eth/v1/config/spec", get(spec))
        .route("/eth/v1/beacon/states/head/validators", get(validators))
        .with_state(node);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fake_node() -> Arc<FakeNode> {
    let mut blocks = HashMap::new();
    for (slot, fork) in [(10, ForkName::Capella), (11, ForkName::Electra)] {
        let raw = fixtures::signed_block(fork, slot).to_raw().unwrap();
        blocks.insert(slot.to_string(), raw);
    }
    Arc::new(FakeNode {
        blocks,
        head_slot: 11,
        ..Default::default()
    })
}

fn client(addr: SocketAddr) -> HttpBeaconNode {
    HttpBeaconNode::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetches_versioned_block_by_slot() {
    let addr = serve(fake_node()).await;
    let node = client(addr);

    let raw = node.block(BlockId::Slot(11)).await.unwrap();
    assert_eq!(raw.version, "electra");

    let block = VersionedSignedBlock::decode(&raw).unwrap();
    assert_eq!(block, fixtures::signed_block(ForkName::Electra, 11));
}

#[tokio::test]
async fn test_missing_block_is_not_found() {
    let addr = serve(fake_node()).await;
    let node = client(addr);

    match node.block(BlockId::Slot(12)).await {
        Err(NodeError::NotFound(id)) => assert_eq!(id, BlockId::Slot(12)),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_are_upstream_errors() {
    let addr = serve(fake_node()).await;
    let node = client(addr);

    let err = node.block(BlockId::Slot(500)).await.unwrap_err();
    match err {
        NodeError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "node overloaded");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_body_is_a_decode_error() {
    let addr = serve(fake_node()).await;
    let node = client(addr);

    assert!(matches!(
        node.block(BlockId::Slot(13)).await,
        Err(NodeError::Decode(_))
    ));
}

#[tokio::test]
async fn test_latest_header_reports_head_slot() {
    let addr = serve(fake_node()).await;
    let node = client(addr);

    let header = node.latest_header().await.unwrap();
    assert_eq!(header.slot(), 11);
    assert!(header.canonical);
}

#[tokio::test]
async fn test_chain_constants_are_strings_and_cached() {
    let fake = fake_node();
    let addr = serve(fake.clone()).await;
    let node = client(addr);

    let constants = node.chain_constants().await.unwrap();
    assert_eq!(constants["SLOTS_PER_EPOCH"], "32");
    assert_eq!(constants["SECONDS_PER_SLOT"], "12");
    assert!(constants["BLOB_SCHEDULE"].starts_with('['));

    node.chain_constants().await.unwrap();
    assert_eq!(fake.spec_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_validator_list_is_served_from_cache_until_stale() {
    let fake = fake_node();
    let addr = serve(fake.clone()).await;
    let node = client(addr).with_validator_cache_ttl(Duration::from_millis(200));

    let first = node.validators().await.unwrap();
    let second = node.validators().await.unwrap();
    assert_eq!(first.len(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fake.validator_requests.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    node.validators().await.unwrap();
    assert_eq!(fake.validator_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_node_is_an_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let node = HttpBeaconNode::new(&format!("http://{addr}"), Duration::from_millis(500)).unwrap();
    assert!(matches!(
        node.block(BlockId::Head).await,
        Err(NodeError::Http(_))
    ));
}
