//! Scanner timing and cache parameters.

use std::time::Duration;

/// Tick of the outer scheduler while no loop is running.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(10);

/// Pause between block fetches of a running loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Back-off when the next height is ahead of the chain head.
pub const DEFAULT_HEAD_WAIT: Duration = Duration::from_secs(1);

/// How long a height may keep failing before a range task passes over it.
pub const DEFAULT_FAILURE_WINDOW: Duration = Duration::from_secs(10);

/// Heights remembered by the failure cache.
pub const DEFAULT_FAILURE_CACHE_CAPACITY: usize = 1000;

/// Progress is logged every this many heights.
pub const PROGRESS_LOG_INTERVAL: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    pub idle_interval: Duration,
    pub poll_interval: Duration,
    pub head_wait: Duration,
    pub failure_window: Duration,
    pub failure_cache_capacity: usize,
    /// Lease length of the per-task distributed lock, when one is configured.
    pub lock_ttl: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            idle_interval: DEFAULT_IDLE_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            head_wait: DEFAULT_HEAD_WAIT,
            failure_window: DEFAULT_FAILURE_WINDOW,
            failure_cache_capacity: DEFAULT_FAILURE_CACHE_CAPACITY,
            lock_ttl: Duration::from_secs(30),
        }
    }
}
