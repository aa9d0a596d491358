mod running_tests;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chain::ChainSpec;
use containers::{BlockHeader, ForkName, RawBlock, ValidatorSummary, fixtures};
use networking::{BeaconNode, BlockId, NodeError};
use parking_lot::Mutex;
use storage::SqliteStore;

use crate::config::ScannerConfig;
use crate::context::ScanContext;

/// Beacon node over an in-memory map of blocks.
#[derive(Default)]
pub(crate) struct FakeNode {
    head: Mutex<u64>,
    blocks: Mutex<HashMap<u64, RawBlock>>,
    failing: Mutex<HashSet<u64>>,
    requests: Mutex<Vec<u64>>,
}

impl FakeNode {
    /// Deneb blocks at every slot of `slots`, head at the last one.
    pub(crate) fn with_blocks(slots: impl IntoIterator<Item = u64>) -> Arc<Self> {
        let node = Self::default();
        for slot in slots {
            node.insert(slot);
        }
        Arc::new(node)
    }

    pub(crate) fn insert(&self, slot: u64) {
        let raw = fixtures::signed_block(ForkName::Deneb, slot)
            .to_raw()
            .expect("fixture block encodes");
        self.insert_raw(slot, raw);
    }

    pub(crate) fn insert_raw(&self, slot: u64, raw: RawBlock) {
        self.blocks.lock().insert(slot, raw);
        let mut head = self.head.lock();
        *head = (*head).max(slot);
    }

    pub(crate) fn set_head(&self, slot: u64) {
        *self.head.lock() = slot;
    }

    pub(crate) fn fail(&self, slot: u64) {
        self.failing.lock().insert(slot);
    }

    pub(crate) fn recover(&self, slot: u64) {
        self.failing.lock().remove(&slot);
    }

    pub(crate) fn requests(&self) -> Vec<u64> {
        self.requests.lock().clone()
    }

    pub(crate) fn requests_for(&self, slot: u64) -> usize {
        self.requests.lock().iter().filter(|&&s| s == slot).count()
    }
}

#[async_trait::async_trait]
impl BeaconNode for FakeNode {
    async fn header(&self, id: BlockId) -> Result<BlockHeader, NodeError> {
        let slot = match id {
            BlockId::Head => *self.head.lock(),
            BlockId::Slot(slot) => slot,
            other => return Err(NodeError::NotFound(other)),
        };
        let mut header = BlockHeader::default();
        header.header.message.slot = slot;
        Ok(header)
    }

    async fn block(&self, id: BlockId) -> Result<RawBlock, NodeError> {
        let BlockId::Slot(slot) = id else {
            return Err(NodeError::NotFound(id));
        };
        self.requests.lock().push(slot);

        if self.failing.lock().contains(&slot) {
            return Err(NodeError::Upstream {
                status: 503,
                body: "node is syncing".to_string(),
            });
        }
        self.blocks
            .lock()
            .get(&slot)
            .cloned()
            .ok_or(NodeError::NotFound(id))
    }

    async fn chain_constants(&self) -> Result<HashMap<String, String>, NodeError> {
        Ok(HashMap::new())
    }

    async fn validators(&self) -> Result<Arc<Vec<ValidatorSummary>>, NodeError> {
        Ok(Arc::new(Vec::new()))
    }
}

pub(crate) fn fast_config() -> ScannerConfig {
    ScannerConfig {
        idle_interval: Duration::from_millis(20),
        poll_interval: Duration::from_millis(1),
        head_wait: Duration::from_millis(5),
        failure_window: Duration::from_millis(30),
        failure_cache_capacity: 16,
        lock_ttl: Duration::from_secs(1),
    }
}

pub(crate) fn context(node: Arc<FakeNode>, config: ScannerConfig) -> (Arc<ScanContext>, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
    let ctx = ScanContext::new(node, store.clone(), ChainSpec::default()).with_config(config);
    (Arc::new(ctx), store)
}

/// Poll `condition` until it holds, failing the test after a few seconds.
pub(crate) async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not met in time");
}
