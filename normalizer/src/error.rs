use containers::{DecodeError, ForkName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The node serves a fork this build cannot read; it needs upgrading.
    #[error("unknown block version {0:?}")]
    UnknownVersion(String),

    #[error("malformed {fork} block: {reason}")]
    Malformed { fork: ForkName, reason: String },
}

impl From<DecodeError> for NormalizeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownVersion(version) => NormalizeError::UnknownVersion(version),
            DecodeError::Malformed { fork, source } => NormalizeError::Malformed {
                fork,
                reason: source.to_string(),
            },
        }
    }
}
