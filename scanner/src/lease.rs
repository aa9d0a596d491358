use std::sync::Arc;
use std::time::Duration;

use lock::{DistributedLock, LockError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Cross-process claim on one task, renewed while its loop runs.
pub struct TaskLease {
    lock: Arc<DistributedLock>,
    key: String,
    ttl: Duration,
    renewed_at: Instant,
}

pub fn lease_key(task_type: &str, task: i64) -> String {
    format!("beacon-scanner:{task_type}:{task}")
}

impl TaskLease {
    /// Try once to take the task. `None` means another instance holds it.
    pub async fn claim(
        lock: Arc<DistributedLock>,
        task_type: &str,
        task: i64,
        ttl: Duration,
    ) -> Result<Option<Self>, LockError> {
        let key = lease_key(task_type, task);
        if !lock.acquire(&key, ttl).await? {
            debug!(%key, "Task held by another instance");
            return Ok(None);
        }

        info!(%key, ttl_ms = ttl.as_millis() as u64, "Task lease acquired");
        Ok(Some(Self {
            lock,
            key,
            ttl,
            renewed_at: Instant::now(),
        }))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Renew once a third of the lease has passed. Returns `false` once the
    /// lease is lost, after which the loop must stop.
    pub async fn keep_alive(&mut self) -> bool {
        let since_renewal = self.renewed_at.elapsed();
        if since_renewal < self.ttl / 3 {
            return true;
        }

        match self.lock.extend(&self.key, self.ttl).await {
            Ok(()) => {
                self.renewed_at = Instant::now();
                true
            }
            Err(LockError::NotHeld { .. }) => {
                warn!(key = %self.key, "Task lease lost");
                false
            }
            Err(err) => {
                warn!(key = %self.key, %err, "Failed to renew task lease");
                since_renewal < self.ttl
            }
        }
    }

    pub async fn release(self) {
        match self.lock.release(&self.key).await {
            Ok(_) => debug!(key = %self.key, "Task lease released"),
            Err(err) => warn!(key = %self.key, %err, "Failed to release task lease"),
        }
    }
}
