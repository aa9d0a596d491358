use std::sync::Arc;

use chain::ChainSpec;
use lock::DistributedLock;
use metrics::Metrics;
use networking::BeaconNode;
use storage::Store;
use tracing::{info, warn};

use crate::config::ScannerConfig;

/// Collaborators shared by every scan loop of a process.
pub struct ScanContext {
    pub node: Arc<dyn BeaconNode>,
    pub store: Arc<dyn Store>,
    pub spec: ChainSpec,
    pub config: ScannerConfig,
    pub lock: Option<Arc<DistributedLock>>,
    pub metrics: Option<Arc<Metrics>>,
}

impl ScanContext {
    pub fn new(node: Arc<dyn BeaconNode>, store: Arc<dyn Store>, spec: ChainSpec) -> Self {
        Self {
            node,
            store,
            spec,
            config: ScannerConfig::default(),
            lock: None,
            metrics: None,
        }
    }

    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_lock(mut self, lock: Arc<DistributedLock>) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Read the network constants from the node, falling back to mainnet values
/// when the node cannot be asked.
pub async fn load_chain_spec(node: &dyn BeaconNode) -> ChainSpec {
    match node.chain_constants().await {
        Ok(constants) => {
            let spec = ChainSpec::from_constants(&constants);
            info!(
                slots_per_epoch = spec.slots_per_epoch,
                seconds_per_slot = spec.seconds_per_slot,
                "Loaded chain constants"
            );
            spec
        }
        Err(err) => {
            warn!(%err, "Failed to read chain constants, using mainnet defaults");
            ChainSpec::default()
        }
    }
}
