use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

/// What to do with a height whose fetch just failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Try the same height again.
    Retry,
    /// The height kept failing for a whole window; move past it.
    Skip,
}

/// Bounded memory of heights that failed to fetch, keyed by task.
///
/// The first failure of a height starts its window. A failure reported once
/// the window has elapsed turns into [`FailureVerdict::Skip`], so a height is
/// always retried at least once after its window expires before it is given
/// up. A success in between clears the entry.
pub struct FailureCache {
    window: Duration,
    first_failures: Mutex<LruCache<(i64, u64), Instant>>,
}

impl FailureCache {
    pub fn new(window: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            window,
            first_failures: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn record_failure(&self, task: i64, height: u64, now: Instant) -> FailureVerdict {
        let mut first_failures = self.first_failures.lock();
        match first_failures.get(&(task, height)) {
            Some(first) if now.saturating_duration_since(*first) >= self.window => {
                first_failures.pop(&(task, height));
                FailureVerdict::Skip
            }
            Some(_) => FailureVerdict::Retry,
            None => {
                first_failures.put((task, height), now);
                FailureVerdict::Retry
            }
        }
    }

    pub fn clear(&self, task: i64, height: u64) {
        self.first_failures.lock().pop(&(task, height));
    }

    pub fn len(&self) -> usize {
        self.first_failures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
