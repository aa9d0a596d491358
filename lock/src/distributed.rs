use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, warn};

use crate::backend::LockBackend;
use crate::error::LockError;

/// Pause between attempts of [`DistributedLock::blocking_acquire`].
pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// One lock participant. Its token is fixed for its whole lifetime, so the
/// same instance can hold several keys and release only those.
pub struct DistributedLock {
    backend: Arc<dyn LockBackend>,
    token: String,
}

impl DistributedLock {
    pub fn new(backend: Arc<dyn LockBackend>) -> Self {
        let bytes: [u8; 16] = rand::random();
        Self {
            backend,
            token: hex::encode(bytes),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Try once. `Ok(false)` means someone else holds `key`.
    pub async fn acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError> {
        let held = self.backend.set_if_absent(key, &self.token, ttl).await?;
        debug!(key, held, "Lock acquire attempt");
        Ok(held)
    }

    /// Retry every [`RETRY_INTERVAL`] until the lock is held or `max_wait`
    /// has elapsed. `Ok` means the lock is held; running out of time is
    /// [`LockError::Timeout`]. Backend errors during the wait are retried.
    pub async fn blocking_acquire(
        &self,
        key: &str,
        ttl: Duration,
        max_wait: Duration,
    ) -> Result<(), LockError> {
        let attempts = async {
            let mut ticker = interval(RETRY_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.acquire(key, ttl).await {
                    Ok(true) => return,
                    Ok(false) => {}
                    Err(err) => warn!(key, %err, "Lock acquire failed, retrying"),
                }
            }
        };

        timeout(max_wait, attempts)
            .await
            .map_err(|_| LockError::Timeout {
                key: key.to_string(),
                waited: max_wait,
            })
    }

    /// Release `key` if this instance still holds it.
    pub async fn release(&self, key: &str) -> Result<bool, LockError> {
        if self.backend.delete_if_equals(key, &self.token).await? {
            debug!(key, "Lock released");
            Ok(true)
        } else {
            Err(LockError::NotHeld {
                key: key.to_string(),
            })
        }
    }

    /// Push the expiry of a held lock `ttl` into the future.
    pub async fn extend(&self, key: &str, ttl: Duration) -> Result<(), LockError> {
        if self.backend.extend_if_equals(key, &self.token, ttl).await? {
            Ok(())
        } else {
            Err(LockError::NotHeld {
                key: key.to_string(),
            })
        }
    }
}
