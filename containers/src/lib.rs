pub mod altair;
pub mod bellatrix;
pub mod block;
pub mod capella;
pub mod checkpoint;
pub mod deneb;
pub mod electra;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod fulu;
pub mod phase0;
pub mod records;
pub mod serde_helpers;
pub mod types;
pub mod validator;

pub use block::{BlockHeader, ForkName, RawBlock, VersionedSignedBlock};
pub use checkpoint::Checkpoint;
pub use error::DecodeError;
pub use records::{AttestationRecord, BlockRecord};
pub use types::{hex_string, BlsPubkey, BlsSignature, Root};
pub use validator::{Validator, ValidatorSummary};
