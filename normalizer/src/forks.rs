//! One block mapping and one attestation walker per fork.
//!
//! The bodies look alike, but field paths differ between forks and each
//! mapping is kept separate so it can be checked against its own fork.

use chain::ChainSpec;
use containers::{
    altair, bellatrix, capella, deneb, electra, fulu, hex_string, phase0, AttestationRecord,
    BlockRecord, ForkName,
};

pub fn phase0_block(block: &phase0::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: None,
        execution_block_number: None,
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Phase0,
    }
}

pub fn phase0_attestations(block: &phase0::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation.data.index,
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn altair_block(block: &altair::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: None,
        execution_block_number: None,
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Altair,
    }
}

pub fn altair_attestations(block: &altair::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation.data.index,
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn bellatrix_block(block: &bellatrix::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: Some(hex_string(body.execution_payload.block_hash)),
        execution_block_number: Some(body.execution_payload.block_number),
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Bellatrix,
    }
}

pub fn bellatrix_attestations(block: &bellatrix::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation.data.index,
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn capella_block(block: &capella::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: Some(hex_string(body.execution_payload.block_hash)),
        execution_block_number: Some(body.execution_payload.block_number),
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Capella,
    }
}

pub fn capella_attestations(block: &capella::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation.data.index,
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn deneb_block(block: &deneb::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: Some(hex_string(body.execution_payload.block_hash)),
        execution_block_number: Some(body.execution_payload.block_number),
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Deneb,
    }
}

pub fn deneb_attestations(block: &deneb::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation.data.index,
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn electra_block(block: &electra::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: Some(hex_string(body.execution_payload.block_hash)),
        execution_block_number: Some(body.execution_payload.block_number),
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Electra,
    }
}

pub fn electra_attestations(block: &electra::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation
                .first_committee_index()
                .unwrap_or(attestation.data.index),
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}

pub fn fulu_block(block: &fulu::SignedBeaconBlock, spec: &ChainSpec) -> BlockRecord {
    let message = &block.message;
    let body = &message.body;
    BlockRecord {
        slot: message.slot,
        epoch: spec.epoch_at_slot(message.slot),
        proposer_index: message.proposer_index,
        parent_root: hex_string(message.parent_root),
        state_root: hex_string(message.state_root),
        randao_reveal: hex_string(body.randao_reveal),
        graffiti: hex_string(body.graffiti),
        eth1_block_hash: Some(hex_string(body.eth1_data.block_hash)),
        eth1_deposit_root: Some(hex_string(body.eth1_data.deposit_root)),
        eth1_deposit_count: Some(body.eth1_data.deposit_count),
        execution_block_hash: Some(hex_string(body.execution_payload.block_hash)),
        execution_block_number: Some(body.execution_payload.block_number),
        signature: hex_string(block.signature),
        proposer_slashings: body.proposer_slashings.len() as u64,
        attester_slashings: body.attester_slashings.len() as u64,
        fork: ForkName::Fulu,
    }
}

pub fn fulu_attestations(block: &fulu::SignedBeaconBlock) -> Vec<AttestationRecord> {
    block
        .message
        .body
        .attestations
        .iter()
        .enumerate()
        .map(|(position, attestation)| AttestationRecord {
            slot: block.message.slot,
            attest_index: position as u64,
            aggregation_bits: hex_string(&attestation.aggregation_bits),
            beacon_block_root: hex_string(attestation.data.beacon_block_root),
            committee_index: attestation
                .first_committee_index()
                .unwrap_or(attestation.data.index),
            source_epoch: attestation.data.source.epoch,
            source_root: hex_string(attestation.data.source.root),
            target_epoch: attestation.data.target.epoch,
            target_root: hex_string(attestation.data.target.root),
            signature: hex_string(attestation.signature),
        })
        .collect()
}
