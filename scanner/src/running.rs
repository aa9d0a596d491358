use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

/// Which task ids currently have a scan loop.
///
/// Lookups from the scheduler tick take the read lock; claiming and releasing
/// take the write lock.
#[derive(Default)]
pub struct RunningTasks {
    running: RwLock<HashSet<i64>>,
}

impl RunningTasks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_running(&self, task: i64) -> bool {
        self.running.read().contains(&task)
    }

    /// Mark `task` running unless it already is. The mark is removed when the
    /// returned guard drops.
    pub fn try_claim(self: &Arc<Self>, task: i64) -> Option<RunningGuard> {
        if self.running.write().insert(task) {
            Some(RunningGuard {
                tasks: Arc::clone(self),
                task,
            })
        } else {
            None
        }
    }

    pub fn count(&self) -> usize {
        self.running.read().len()
    }
}

pub struct RunningGuard {
    tasks: Arc<RunningTasks>,
    task: i64,
}

impl RunningGuard {
    pub fn task(&self) -> i64 {
        self.task
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.tasks.running.write().remove(&self.task);
    }
}
