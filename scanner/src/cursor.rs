use storage::{Store, StoreResult};

/// Reaction of a cursor to a failed block fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchFailure {
    /// Try the same height again after the poll interval.
    Retry,
    /// Advance past the height without a block.
    Skip,
    /// End the loop; the scheduler restarts it on its next tick.
    Yield,
}

/// Progress of one task as seen by its scan loop.
///
/// Cursors are cloned before an advance and only replace the loop's copy once
/// the advanced state is durable.
pub(crate) trait Cursor: Clone + Send + Sync + 'static {
    fn task_id(&self) -> i64;

    fn task_type(&self) -> &str;

    /// `task` label of log records and metrics.
    fn label(&self) -> String;

    fn next_height(&self) -> u64;

    fn is_complete(&self) -> bool;

    /// Heights left before completion, `None` for unbounded tasks.
    fn remaining(&self) -> Option<u64>;

    fn advance(&mut self, height: u64);

    fn persist(&self, store: &dyn Store) -> StoreResult<()>;

    fn on_fetch_failure(&self, height: u64) -> FetchFailure;

    fn on_fetched(&self, _height: u64) {}
}
