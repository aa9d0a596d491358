use std::sync::Arc;

use storage::{RANGE_BEACON_BLOCK_TASK, RangeScanTask, Store, StoreResult};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::context::ScanContext;
use crate::cursor::{Cursor, FetchFailure};
use crate::failure_cache::{FailureCache, FailureVerdict};
use crate::running::RunningTasks;
use crate::scheduler::{Scheduler, TaskSource};

#[derive(Clone)]
pub(crate) struct RangeCursor {
    task: RangeScanTask,
    failures: Arc<FailureCache>,
}

impl RangeCursor {
    pub(crate) fn new(task: RangeScanTask, failures: Arc<FailureCache>) -> Self {
        Self { task, failures }
    }
}

impl Cursor for RangeCursor {
    fn task_id(&self) -> i64 {
        self.task.id
    }

    fn task_type(&self) -> &str {
        &self.task.task_type
    }

    fn label(&self) -> String {
        format!("range-{}", self.task.id)
    }

    fn next_height(&self) -> u64 {
        self.task.next_height()
    }

    fn is_complete(&self) -> bool {
        self.task.is_complete()
    }

    fn remaining(&self) -> Option<u64> {
        Some(self.task.remaining())
    }

    fn advance(&mut self, height: u64) {
        let last = self.task.last_processed.map_or(height, |last| last.max(height));
        self.task.last_processed = Some(last);
    }

    fn persist(&self, store: &dyn Store) -> StoreResult<()> {
        store.save_range_task(&self.task)
    }

    fn on_fetch_failure(&self, height: u64) -> FetchFailure {
        match self.failures.record_failure(self.task.id, height, Instant::now()) {
            FailureVerdict::Retry => FetchFailure::Retry,
            FailureVerdict::Skip => FetchFailure::Skip,
        }
    }

    fn on_fetched(&self, height: u64) {
        self.failures.clear(self.task.id, height);
    }
}

struct RangeSource {
    failures: Arc<FailureCache>,
}

impl RangeSource {
    fn cursor(&self, task: RangeScanTask) -> RangeCursor {
        RangeCursor::new(task, Arc::clone(&self.failures))
    }
}

impl TaskSource for RangeSource {
    type Cursor = RangeCursor;

    const NAME: &'static str = "range";

    fn load(&self, store: &dyn Store) -> StoreResult<Vec<RangeCursor>> {
        Ok(store
            .get_enabled_range_tasks(RANGE_BEACON_BLOCK_TASK)?
            .into_iter()
            .map(|task| self.cursor(task))
            .collect())
    }

    fn reload(&self, store: &dyn Store, task: i64) -> StoreResult<Option<RangeCursor>> {
        let task = store.get_range_task(task)?;
        Ok(task.enabled.then(|| self.cursor(task)))
    }
}

/// Backfills every enabled `directly_beacon_block` task over its
/// `start..=end` range.
///
/// ## How It Works
///
/// Each task gets its own scan loop, so a slow or stuck task never holds the
/// others back. Tasks resume from `max(last_processed + 1, start)` and stop
/// for good once `last_processed >= end`.
///
/// A failed fetch is retried on the next poll. The first failure of a height
/// is remembered in a shared [`FailureCache`]; when the height fails again
/// after the failure window has passed, it is skipped and recorded as
/// processed so the task keeps moving.
pub struct RangeScanner {
    scheduler: Scheduler<RangeSource>,
    failures: Arc<FailureCache>,
}

impl RangeScanner {
    pub fn new(ctx: Arc<ScanContext>) -> Self {
        let failures = Arc::new(FailureCache::new(
            ctx.config.failure_window,
            ctx.config.failure_cache_capacity,
        ));
        let source = RangeSource {
            failures: Arc::clone(&failures),
        };
        Self {
            scheduler: Scheduler::new(ctx, source),
            failures,
        }
    }

    pub fn running_tasks(&self) -> Arc<RunningTasks> {
        self.scheduler.running()
    }

    pub fn failures(&self) -> Arc<FailureCache> {
        Arc::clone(&self.failures)
    }

    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        self.scheduler.run(shutdown).await
    }
}
