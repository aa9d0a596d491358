use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use containers::{BlockHeader, RawBlock, ValidatorSummary};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::block_id::BlockId;
use crate::error::NodeError;
use crate::node::BeaconNode;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a fetched validator list is served from cache.
pub const DEFAULT_VALIDATOR_CACHE_TTL: Duration = Duration::from_secs(12);

const VALIDATOR_CACHE_CAPACITY: usize = 4;
const HEAD_STATE: &str = "head";

#[derive(Deserialize)]
struct DataResponse<T> {
    data: T,
}

/// [`BeaconNode`] over the standard beacon REST API.
pub struct HttpBeaconNode {
    client: Client,
    base_url: String,
    validator_cache: Mutex<LruCache<String, (Instant, Arc<Vec<ValidatorSummary>>)>>,
    validator_cache_ttl: Duration,
    constants: RwLock<Option<HashMap<String, String>>>,
}

impl HttpBeaconNode {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        let capacity = NonZeroUsize::new(VALIDATOR_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            validator_cache: Mutex::new(LruCache::new(capacity)),
            validator_cache_ttl: DEFAULT_VALIDATOR_CACHE_TTL,
            constants: RwLock::new(None),
        })
    }

    pub fn with_validator_cache_ttl(mut self, ttl: Duration) -> Self {
        self.validator_cache_ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body. `not_found` decides what a 404 means.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        not_found: Option<BlockId>,
    ) -> Result<T, NodeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Beacon API request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = not_found {
                return Err(NodeError::NotFound(id));
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| NodeError::Decode(format!("{path}: {err}")))
    }
}

fn constant_to_string(value: Value) -> String {
    match value {
        Value::String(value) => value,
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl BeaconNode for HttpBeaconNode {
    async fn header(&self, id: BlockId) -> Result<BlockHeader, NodeError> {
        let response: DataResponse<BlockHeader> = self
            .get(&format!("/eth/v1/beacon/headers/{id}"), Some(id))
            .await?;
        Ok(response.data)
    }

    async fn block(&self, id: BlockId) -> Result<RawBlock, NodeError> {
        self.get(&format!("/eth/v2/beacon/blocks/{id}"), Some(id))
            .await
    }

    async fn chain_constants(&self) -> Result<HashMap<String, String>, NodeError> {
        let cached = self.constants.read().clone();
        if let Some(constants) = cached {
            return Ok(constants);
        }

        let response: DataResponse<HashMap<String, Value>> =
            self.get("/eth/v1/config/spec", None).await?;
        let constants: HashMap<String, String> = response
            .data
            .into_iter()
            .map(|(key, value)| (key, constant_to_string(value)))
            .collect();

        if constants.is_empty() {
            warn!("Node returned an empty chain spec");
        }

        *self.constants.write() = Some(constants.clone());
        Ok(constants)
    }

    async fn validators(&self) -> Result<Arc<Vec<ValidatorSummary>>, NodeError> {
        let cached = self.validator_cache.lock().get(HEAD_STATE).cloned();
        if let Some((fetched_at, validators)) = cached {
            if fetched_at.elapsed() < self.validator_cache_ttl {
                return Ok(validators);
            }
        }

        let response: DataResponse<Vec<ValidatorSummary>> = self
            .get(&format!("/eth/v1/beacon/states/{HEAD_STATE}/validators"), None)
            .await?;
        let validators = Arc::new(response.data);

        self.validator_cache
            .lock()
            .put(HEAD_STATE.to_string(), (Instant::now(), validators.clone()));
        Ok(validators)
    }
}
