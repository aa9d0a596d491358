use std::collections::HashSet;
use std::sync::Arc;

use storage::{Store, StoreResult};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, trace, warn};

use crate::context::ScanContext;
use crate::cursor::Cursor;
use crate::error::ScanError;
use crate::lease::TaskLease;
use crate::running::RunningTasks;
use crate::scan_loop::{LoopExit, ScanLoop};

/// Where a scanner finds its tasks.
pub(crate) trait TaskSource: Send + Sync + 'static {
    type Cursor: Cursor;

    /// `scanner` label of log records.
    const NAME: &'static str;

    /// Every enabled task of this scanner's type.
    fn load(&self, store: &dyn Store) -> StoreResult<Vec<Self::Cursor>>;

    /// Fresh copy of one task, `None` once it is gone or disabled.
    fn reload(&self, store: &dyn Store, task: i64) -> StoreResult<Option<Self::Cursor>>;
}

type LoopOutcome = (i64, Result<LoopExit, ScanError>);

/// Wakes on the idle interval and starts a scan loop for every enabled task
/// that has none.
pub(crate) struct Scheduler<S: TaskSource> {
    ctx: Arc<ScanContext>,
    source: Arc<S>,
    running: Arc<RunningTasks>,
    halted: HashSet<i64>,
    completed: HashSet<i64>,
}

impl<S: TaskSource> Scheduler<S> {
    pub(crate) fn new(ctx: Arc<ScanContext>, source: S) -> Self {
        Self {
            ctx,
            source: Arc::new(source),
            running: RunningTasks::new(),
            halted: HashSet::new(),
            completed: HashSet::new(),
        }
    }

    pub(crate) fn running(&self) -> Arc<RunningTasks> {
        Arc::clone(&self.running)
    }

    pub(crate) async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.ctx.config.idle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut loops: JoinSet<LoopOutcome> = JoinSet::new();

        info!(scanner = S::NAME, "Scanner started");

        while !*shutdown.borrow() {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => self.tick(&mut loops, &shutdown).await,
                Some(joined) = loops.join_next(), if !loops.is_empty() => self.reap(joined),
            }
        }

        info!(scanner = S::NAME, loops = loops.len(), "Scanner stopping");
        while let Some(joined) = loops.join_next().await {
            self.reap(joined);
        }
        info!(scanner = S::NAME, "Scanner stopped");
    }

    async fn tick(&mut self, loops: &mut JoinSet<LoopOutcome>, shutdown: &watch::Receiver<bool>) {
        let store = Arc::clone(&self.ctx.store);
        let source = Arc::clone(&self.source);
        let cursors = match tokio::task::spawn_blocking(move || source.load(store.as_ref())).await {
            Ok(Ok(cursors)) => cursors,
            Ok(Err(err)) => {
                error!(scanner = S::NAME, %err, "Failed to load scan tasks");
                return;
            }
            Err(err) => {
                error!(scanner = S::NAME, %err, "Scan task loader panicked");
                return;
            }
        };

        if cursors.is_empty() {
            info!(scanner = S::NAME, "Scan task not enabled");
            return;
        }

        for cursor in cursors {
            let task = cursor.task_id();

            if self.halted.contains(&task) {
                trace!(scanner = S::NAME, task, "Scan task halted");
                continue;
            }

            if cursor.is_complete() {
                if self.completed.insert(task) {
                    info!(scanner = S::NAME, task, "Scan task complete");
                }
                continue;
            }

            let Some(guard) = self.running.try_claim(task) else {
                trace!(scanner = S::NAME, task, "Scan loop already running");
                continue;
            };

            debug!(scanner = S::NAME, task, height = cursor.next_height(), "Starting scan loop");
            let ctx = Arc::clone(&self.ctx);
            let source = Arc::clone(&self.source);
            let shutdown = shutdown.clone();
            loops.spawn(async move {
                let outcome = run_task(ctx, source, cursor, shutdown).await;
                drop(guard);
                (task, outcome)
            });
        }
    }

    fn reap(&mut self, joined: Result<LoopOutcome, JoinError>) {
        match joined {
            Ok((task, Ok(LoopExit::Complete))) => {
                self.completed.insert(task);
            }
            Ok((task, Ok(exit))) => debug!(scanner = S::NAME, task, ?exit, "Scan loop exited"),
            Ok((task, Err(err))) if err.is_fatal() => {
                error!(scanner = S::NAME, task, %err, "Halting scan task");
                self.halted.insert(task);
            }
            Ok((task, Err(err))) => {
                warn!(scanner = S::NAME, task, %err, "Scan loop failed, retrying on next tick");
            }
            Err(err) => error!(scanner = S::NAME, %err, "Scan loop panicked"),
        }
    }
}

/// Take the task lease when coordination is configured, then run the loop.
pub(crate) async fn run_task<S: TaskSource>(
    ctx: Arc<ScanContext>,
    source: Arc<S>,
    cursor: S::Cursor,
    shutdown: watch::Receiver<bool>,
) -> Result<LoopExit, ScanError> {
    let Some(lock) = ctx.lock.clone() else {
        return ScanLoop::new(ctx, cursor, shutdown, None).run().await;
    };

    let task = cursor.task_id();
    let Some(lease) = TaskLease::claim(lock, cursor.task_type(), task, ctx.config.lock_ttl).await?
    else {
        return Ok(LoopExit::Contended);
    };

    // Another instance may have advanced the task while it held the lease.
    let store = Arc::clone(&ctx.store);
    let reloaded = tokio::task::spawn_blocking(move || source.reload(store.as_ref(), task)).await;
    let cursor = match reloaded {
        Ok(Ok(Some(cursor))) => cursor,
        Ok(Ok(None)) => {
            lease.release().await;
            return Ok(LoopExit::Disabled);
        }
        Ok(Err(err)) => {
            lease.release().await;
            return Err(err.into());
        }
        Err(err) => {
            lease.release().await;
            return Err(err.into());
        }
    };

    ScanLoop::new(ctx, cursor, shutdown, Some(lease)).run().await
}
