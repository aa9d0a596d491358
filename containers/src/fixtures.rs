//! Deterministic blocks for tests in this and dependent crates.
//!
//! Every fork variant of the block at a given slot carries the same header
//! fields, eth1 vote and attestations, so normalizing any of them must yield
//! the same canonical record apart from fork-specific linkage.

use alloy_primitives::{Bytes, B256};

use crate::block::{BeaconBlock, ForkName, SignedBeaconBlock, VersionedSignedBlock};
use crate::checkpoint::Checkpoint;
use crate::phase0::{self, AttestationData, AttesterSlashing, Eth1Data, ProposerSlashing};
use crate::types::{BlsSignature, Root};
use crate::{altair, bellatrix, capella, deneb, electra};

pub const ATTESTATIONS_PER_BLOCK: usize = 2;

pub fn root(seed: u64, tag: u8) -> Root {
    let mut bytes = [tag; 32];
    bytes[24..].copy_from_slice(&seed.to_be_bytes());
    B256::from(bytes)
}

pub fn signature(seed: u64, tag: u8) -> BlsSignature {
    let mut bytes = [tag; 96];
    bytes[88..].copy_from_slice(&seed.to_be_bytes());
    BlsSignature::from(bytes)
}

pub fn proposer_index(slot: u64) -> u64 {
    slot % 64 + 100
}

pub fn execution_block_number(slot: u64) -> u64 {
    slot + 1_000_000
}

fn eth1_data(slot: u64) -> Eth1Data {
    Eth1Data {
        deposit_root: root(slot, 0xd0),
        deposit_count: 4_096,
        block_hash: root(slot, 0xe1),
    }
}

fn attestation_data(slot: u64, index: u64) -> AttestationData {
    let epoch = slot / 32;
    AttestationData {
        slot: slot.saturating_sub(1),
        index,
        beacon_block_root: root(slot, 0xbb),
        source: Checkpoint {
            epoch: epoch.saturating_sub(1),
            root: root(epoch, 0x50),
        },
        target: Checkpoint {
            epoch,
            root: root(epoch, 0x7a),
        },
    }
}

fn phase0_attestations(slot: u64) -> Vec<phase0::Attestation> {
    (0..ATTESTATIONS_PER_BLOCK as u64)
        .map(|index| phase0::Attestation {
            aggregation_bits: Bytes::from(vec![0b0000_0011, 0b0000_0001]),
            data: attestation_data(slot, index),
            signature: signature(slot * 10 + index, 0xa7),
        })
        .collect()
}

/// Electra encoding of the same votes: the committee moves into `committee_bits`.
fn electra_attestations(slot: u64) -> Vec<electra::Attestation> {
    phase0_attestations(slot)
        .into_iter()
        .map(|attestation| {
            let committee = attestation.data.index;
            let mut committee_bits = vec![0u8; 8];
            committee_bits[(committee / 8) as usize] |= 1 << (committee % 8);
            electra::Attestation {
                aggregation_bits: attestation.aggregation_bits,
                data: AttestationData {
                    index: 0,
                    ..attestation.data
                },
                signature: attestation.signature,
                committee_bits: Bytes::from(committee_bits),
            }
        })
        .collect()
}

fn proposer_slashings() -> Vec<ProposerSlashing> {
    vec![ProposerSlashing::default()]
}

fn attester_slashings() -> Vec<AttesterSlashing> {
    vec![AttesterSlashing::default(), AttesterSlashing::default()]
}

fn graffiti() -> B256 {
    let mut bytes = [0u8; 32];
    bytes[..6].copy_from_slice(b"fixtur");
    B256::from(bytes)
}

fn signed<Body>(slot: u64, body: Body) -> SignedBeaconBlock<Body> {
    SignedBeaconBlock {
        message: BeaconBlock {
            slot,
            proposer_index: proposer_index(slot),
            parent_root: root(slot.saturating_sub(1), 0x0b),
            state_root: root(slot, 0x5e),
            body,
        },
        signature: signature(slot, 0x51),
    }
}

/// The block at `slot`, encoded as `fork`.
pub fn signed_block(fork: ForkName, slot: u64) -> VersionedSignedBlock {
    let execution_hash = root(slot, 0xee);
    let block_number = execution_block_number(slot);

    match fork {
        ForkName::Phase0 => VersionedSignedBlock::Phase0(signed(
            slot,
            phase0::BeaconBlockBody {
                randao_reveal: signature(slot, 0x4a),
                eth1_data: eth1_data(slot),
                graffiti: graffiti(),
                proposer_slashings: proposer_slashings(),
                attester_slashings: attester_slashings(),
                attestations: phase0_attestations(slot),
                ..Default::default()
            },
        )),
        ForkName::Altair => VersionedSignedBlock::Altair(signed(
            slot,
            altair::BeaconBlockBody {
                randao_reveal: signature(slot, 0x4a),
                eth1_data: eth1_data(slot),
                graffiti: graffiti(),
                proposer_slashings: proposer_slashings(),
                attester_slashings: attester_slashings(),
                attestations: phase0_attestations(slot),
                ..Default::default()
            },
        )),
        ForkName::Bellatrix => VersionedSignedBlock::Bellatrix(signed(
            slot,
            bellatrix::BeaconBlockBody {
                randao_reveal: signature(slot, 0x4a),
                eth1_data: eth1_data(slot),
                graffiti: graffiti(),
                proposer_slashings: proposer_slashings(),
                attester_slashings: attester_slashings(),
                attestations: phase0_attestations(slot),
                execution_payload: bellatrix::ExecutionPayload {
                    block_hash: execution_hash,
                    block_number,
                    base_fee_per_gas: "7".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        )),
        ForkName::Capella => VersionedSignedBlock::Capella(signed(
            slot,
            capella::BeaconBlockBody {
                randao_reveal: signature(slot, 0x4a),
                eth1_data: eth1_data(slot),
                graffiti: graffiti(),
                proposer_slashings: proposer_slashings(),
                attester_slashings: attester_slashings(),
                attestations: phase0_attestations(slot),
                execution_payload: capella::ExecutionPayload {
                    block_hash: execution_hash,
                    block_number,
                    base_fee_per_gas: "7".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        )),
        ForkName::Deneb => VersionedSignedBlock::Deneb(signed(
            slot,
            deneb::BeaconBlockBody {
                randao_reveal: signature(slot, 0x4a),
                eth1_data: eth1_data(slot),
                graffiti: graffiti(),
                proposer_slashings: proposer_slashings(),
                attester_slashings: attester_slashings(),
                attestations: phase0_attestations(slot),
                execution_payload: deneb::ExecutionPayload {
                    block_hash: execution_hash,
                    block_number,
                    base_fee_per_gas: "7".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        )),
        ForkName::Electra | ForkName::Fulu => {
            let block = signed(
                slot,
                electra::BeaconBlockBody {
                    randao_reveal: signature(slot, 0x4a),
                    eth1_data: eth1_data(slot),
                    graffiti: graffiti(),
                    proposer_slashings: proposer_slashings(),
                    attester_slashings: attester_slashings(),
                    attestations: electra_attestations(slot),
                    execution_payload: deneb::ExecutionPayload {
                        block_hash: execution_hash,
                        block_number,
                        base_fee_per_gas: "7".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            );
            if fork == ForkName::Electra {
                VersionedSignedBlock::Electra(block)
            } else {
                VersionedSignedBlock::Fulu(block)
            }
        }
    }
}
