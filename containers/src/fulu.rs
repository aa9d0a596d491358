//! Fulu (PeerDAS) changes data availability sampling, not the block body, so
//! the Electra containers are reused as-is under their own fork tag.

pub use crate::electra::{
    Attestation, BeaconBlock, BeaconBlockBody, ExecutionRequests, SignedBeaconBlock,
};
