use lock::LockError;
use networking::NodeError;
use normalizer::NormalizeError;
use storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Node unreachable or misbehaving. Retried, never fatal.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] NodeError),

    /// The node serves a fork this build cannot decode.
    #[error("unknown block version {version:?} at height {height}")]
    UnknownVersion { height: u64, version: String },

    /// The payload did not match the layout of its own fork.
    #[error("malformed block at height {height}: {reason}")]
    Malformed { height: u64, reason: String },

    /// The block was rolled back and progress was not advanced.
    #[error("storage transaction failed: {0}")]
    StorageTransaction(#[from] StoreError),

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("scan task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScanError {
    pub(crate) fn from_normalize(height: u64, err: NormalizeError) -> Self {
        match err {
            NormalizeError::UnknownVersion(version) => ScanError::UnknownVersion { height, version },
            NormalizeError::Malformed { fork, reason } => ScanError::Malformed {
                height,
                reason: format!("{fork}: {reason}"),
            },
        }
    }

    /// Structural errors stop the affected task until the process restarts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::UnknownVersion { .. } | ScanError::Malformed { .. }
        )
    }
}
