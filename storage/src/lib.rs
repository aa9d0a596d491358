//! Durable state of the scanner: canonical blocks, attestations and task
//! cursors.
//!
//! The traits are synchronous; async callers run them on the blocking pool.

mod error;
mod schema;
mod sqlite;
mod tasks;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;
pub use tasks::{RangeScanTask, ScanTask, BEACON_BLOCK_TASK, RANGE_BEACON_BLOCK_TASK};

use containers::{AttestationRecord, BlockRecord};

pub trait BlockStore: Send + Sync {
    /// Write a block and its attestations as one unit.
    ///
    /// Writing the same slot again replaces the previous rows, so replays
    /// after a crash are harmless.
    fn store_block(&self, block: &BlockRecord, attestations: &[AttestationRecord])
        -> StoreResult<()>;

    fn get_block(&self, slot: u64) -> StoreResult<Option<BlockRecord>>;

    /// Attestations of a block in positional order.
    fn get_attestations(&self, slot: u64) -> StoreResult<Vec<AttestationRecord>>;

    fn block_count(&self) -> StoreResult<u64>;
}

pub trait TaskStore: Send + Sync {
    /// First enabled tailing task of the given type.
    fn get_enabled_task(&self, task_type: &str) -> StoreResult<Option<ScanTask>>;

    fn save_task(&self, task: &ScanTask) -> StoreResult<()>;

    fn create_task(&self, task_type: &str, last_processed: u64) -> StoreResult<ScanTask>;

    fn get_enabled_range_tasks(&self, task_type: &str) -> StoreResult<Vec<RangeScanTask>>;

    fn get_range_task(&self, id: i64) -> StoreResult<RangeScanTask>;

    fn save_range_task(&self, task: &RangeScanTask) -> StoreResult<()>;

    fn create_range_task(&self, task_type: &str, start: u64, end: u64)
        -> StoreResult<RangeScanTask>;
}

/// Everything a scan loop needs from storage.
pub trait Store: BlockStore + TaskStore {}

impl<T: BlockStore + TaskStore> Store for T {}
