use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    /// The key is absent or held under another token.
    #[error("lock {key:?} is not held by this instance")]
    NotHeld { key: String },

    #[error("timed out after {waited:?} waiting for lock {key:?}")]
    Timeout { key: String, waited: Duration },

    #[error("lock backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for LockError {
    fn from(err: redis::RedisError) -> Self {
        LockError::Backend(err.to_string())
    }
}
