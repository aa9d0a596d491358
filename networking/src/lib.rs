//! Typed access to a consensus node's beacon REST API.

mod block_id;
mod error;
mod http;
mod node;

pub use block_id::BlockId;
pub use error::NodeError;
pub use http::{DEFAULT_TIMEOUT, DEFAULT_VALIDATOR_CACHE_TTL, HttpBeaconNode};
pub use node::BeaconNode;
