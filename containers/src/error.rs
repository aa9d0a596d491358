use thiserror::Error;

use crate::block::ForkName;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The version tag names a fork this build does not know about.
    #[error("unknown block version {0:?}")]
    UnknownVersion(String),

    #[error("malformed {fork} block: {source}")]
    Malformed {
        fork: ForkName,
        #[source]
        source: serde_json::Error,
    },
}
