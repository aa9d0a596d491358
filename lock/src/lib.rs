//! Token-based mutual exclusion shared between scanner processes.
//!
//! ## How It Works
//!
//! Every [`DistributedLock`] owns a random token. Acquiring sets
//! `key = token` only if the key is absent, with an expiry. Releasing and
//! extending compare the stored value with the token and act only on a match,
//! in one atomic backend operation, so a holder whose lease already expired
//! can never remove a lock that now belongs to someone else.

mod backend;
mod distributed;
mod error;
mod memory;
mod redis_backend;

pub use backend::LockBackend;
pub use distributed::{DistributedLock, RETRY_INTERVAL};
pub use error::LockError;
pub use memory::MemoryLockBackend;
pub use redis_backend::RedisLockBackend;
