use std::time::Duration;

use crate::error::LockError;

/// Atomic primitives a lock store has to provide.
#[async_trait::async_trait]
pub trait LockBackend: Send + Sync {
    /// Set `key` to `value` with expiry `ttl` unless it exists.
    /// Returns whether the key was set.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration)
        -> Result<bool, LockError>;

    /// Delete `key` if it currently holds `value`.
    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, LockError>;

    /// Reset the expiry of `key` to `ttl` if it currently holds `value`.
    async fn extend_if_equals(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockError>;
}
