use thiserror::Error;

use crate::block_id::BlockId;

#[derive(Debug, Error)]
pub enum NodeError {
    /// The node has no block for this identifier (empty slot, pruned, or not
    /// produced yet).
    #[error("block {0} not found")]
    NotFound(BlockId),

    #[error("node answered {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl NodeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NodeError::NotFound(_))
    }
}
