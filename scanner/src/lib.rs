//! Block ingestion from a beacon node into the block store.
//!
//! Two scanners share one scan loop:
//!
//! - **Tailing Scanner**: follows the chain head from the `beacon_block` task
//! - **Range Scanner**: backfills every enabled `directly_beacon_block` task
//!   concurrently, skipping heights that keep failing
//!
//! ## State Machine
//!
//! - **IDLE**: no loop for the task, the scheduler tick may start one
//! - **REFRESHING**: reading the head slot
//! - **WAITING**: caught up with the head
//! - **FETCHING**: requesting the next height
//! - **PERSISTING**: writing the block, then advancing the cursor
//!
//! A task has at most one loop per process; with a distributed lock
//! configured, at most one across processes.

pub mod config;
pub mod context;
mod cursor;
pub mod error;
pub mod failure_cache;
pub mod lease;
mod range;
pub mod running;
mod scan_loop;
mod scheduler;
pub mod states;
mod tailing;

pub use config::*;
pub use context::{ScanContext, load_chain_spec};
pub use error::ScanError;
pub use failure_cache::{FailureCache, FailureVerdict};
pub use lease::{TaskLease, lease_key};
pub use range::RangeScanner;
pub use running::{RunningGuard, RunningTasks};
pub use scan_loop::LoopExit;
pub use states::ScanState;
pub use tailing::TailingScanner;

#[cfg(test)]
mod tests;
