use std::collections::HashMap;
use std::sync::Arc;

use containers::{BlockHeader, RawBlock, ValidatorSummary};

use crate::block_id::BlockId;
use crate::error::NodeError;

/// What the scanners need from a consensus node.
///
/// Implementations enforce their own request timeout and report a missing
/// block as [`NodeError::NotFound`], distinct from every other failure.
#[async_trait::async_trait]
pub trait BeaconNode: Send + Sync {
    async fn header(&self, id: BlockId) -> Result<BlockHeader, NodeError>;

    async fn block(&self, id: BlockId) -> Result<RawBlock, NodeError>;

    /// Network configuration constants, values rendered as strings.
    async fn chain_constants(&self) -> Result<HashMap<String, String>, NodeError>;

    async fn validators(&self) -> Result<Arc<Vec<ValidatorSummary>>, NodeError>;

    async fn latest_header(&self) -> Result<BlockHeader, NodeError> {
        self.header(BlockId::Head).await
    }
}
