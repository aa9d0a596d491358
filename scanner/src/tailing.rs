use std::sync::Arc;

use storage::{BEACON_BLOCK_TASK, ScanTask, Store, StoreResult};
use tokio::sync::watch;

use crate::context::ScanContext;
use crate::cursor::{Cursor, FetchFailure};
use crate::running::RunningTasks;
use crate::scheduler::{Scheduler, TaskSource};

#[derive(Clone, Debug)]
pub(crate) struct TailCursor {
    task: ScanTask,
}

impl TailCursor {
    pub(crate) fn new(task: ScanTask) -> Self {
        Self { task }
    }
}

impl Cursor for TailCursor {
    fn task_id(&self) -> i64 {
        self.task.id
    }

    fn task_type(&self) -> &str {
        &self.task.task_type
    }

    fn label(&self) -> String {
        format!("tailing-{}", self.task.id)
    }

    fn next_height(&self) -> u64 {
        self.task.next_height()
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn remaining(&self) -> Option<u64> {
        None
    }

    fn advance(&mut self, height: u64) {
        self.task.last_processed = self.task.last_processed.max(height);
    }

    fn persist(&self, store: &dyn Store) -> StoreResult<()> {
        store.save_task(&self.task)
    }

    // Picked up again by the next idle tick.
    fn on_fetch_failure(&self, _height: u64) -> FetchFailure {
        FetchFailure::Yield
    }
}

struct TailSource;

impl TaskSource for TailSource {
    type Cursor = TailCursor;

    const NAME: &'static str = "tailing";

    fn load(&self, store: &dyn Store) -> StoreResult<Vec<TailCursor>> {
        Ok(store
            .get_enabled_task(BEACON_BLOCK_TASK)?
            .map(TailCursor::new)
            .into_iter()
            .collect())
    }

    fn reload(&self, store: &dyn Store, task: i64) -> StoreResult<Option<TailCursor>> {
        Ok(store
            .get_enabled_task(BEACON_BLOCK_TASK)?
            .filter(|loaded| loaded.id == task)
            .map(TailCursor::new))
    }
}

/// Follows the chain head from the enabled `beacon_block` task, forever.
///
/// Every idle tick loads the task and, unless its loop is already running,
/// starts one. The loop walks `last_processed + 1` up to the head and keeps
/// waiting for new heads; a failed fetch ends it and the next tick resumes
/// from the persisted cursor.
pub struct TailingScanner {
    scheduler: Scheduler<TailSource>,
}

impl TailingScanner {
    pub fn new(ctx: Arc<ScanContext>) -> Self {
        Self {
            scheduler: Scheduler::new(ctx, TailSource),
        }
    }

    pub fn running_tasks(&self) -> Arc<RunningTasks> {
        self.scheduler.running()
    }

    /// Run until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        self.scheduler.run(shutdown).await
    }
}
