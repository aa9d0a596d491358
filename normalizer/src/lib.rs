//! Flattens fork-specific blocks into [`BlockRecord`] and [`AttestationRecord`].
//!
//! ## How It Works
//!
//! 1. The version tag of the [`RawBlock`] selects exactly one fork layout
//!    (`VersionedSignedBlock::decode`); an unknown tag is an error, never a
//!    guess based on which fields are present.
//! 2. One mapping function per fork copies header fields, the eth1 vote,
//!    execution linkage, graffiti, slashing counts and the signature.
//! 3. One attestation walker per fork assigns positional indices `0..n`.
//!
//! Adding a fork means adding a variant and its two mapping functions in
//! [`forks`]; existing mappings are not touched.

mod error;
pub mod forks;

pub use error::NormalizeError;

use chain::ChainSpec;
use containers::{AttestationRecord, BlockRecord, RawBlock, VersionedSignedBlock};
use tracing::trace;

/// Decode and flatten a block as served by the node.
pub fn normalize(
    raw: &RawBlock,
    spec: &ChainSpec,
) -> Result<(BlockRecord, Vec<AttestationRecord>), NormalizeError> {
    let block = VersionedSignedBlock::decode(raw)?;
    Ok(normalize_block(&block, spec))
}

/// Flatten an already decoded block. Infallible: every variant has a mapping.
pub fn normalize_block(
    block: &VersionedSignedBlock,
    spec: &ChainSpec,
) -> (BlockRecord, Vec<AttestationRecord>) {
    let (record, attestations) = match block {
        VersionedSignedBlock::Phase0(block) => (
            forks::phase0_block(block, spec),
            forks::phase0_attestations(block),
        ),
        VersionedSignedBlock::Altair(block) => (
            forks::altair_block(block, spec),
            forks::altair_attestations(block),
        ),
        VersionedSignedBlock::Bellatrix(block) => (
            forks::bellatrix_block(block, spec),
            forks::bellatrix_attestations(block),
        ),
        VersionedSignedBlock::Capella(block) => (
            forks::capella_block(block, spec),
            forks::capella_attestations(block),
        ),
        VersionedSignedBlock::Deneb(block) => (
            forks::deneb_block(block, spec),
            forks::deneb_attestations(block),
        ),
        VersionedSignedBlock::Electra(block) => (
            forks::electra_block(block, spec),
            forks::electra_attestations(block),
        ),
        VersionedSignedBlock::Fulu(block) => (
            forks::fulu_block(block, spec),
            forks::fulu_attestations(block),
        ),
    };

    trace!(
        slot = record.slot,
        fork = %record.fork,
        attestations = attestations.len(),
        "Normalized block"
    );

    (record, attestations)
}
