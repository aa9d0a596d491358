use chain::{ChainSpec, MAINNET_SPEC};
use containers::fixtures::{self, ATTESTATIONS_PER_BLOCK};
use containers::{hex_string, ForkName, RawBlock, VersionedSignedBlock};
use normalizer::{normalize, NormalizeError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

const SLOT: u64 = 4_000;

fn raw(fork: ForkName, slot: u64) -> RawBlock {
    fixtures::signed_block(fork, slot).to_raw().unwrap()
}

#[rstest]
#[case(ForkName::Phase0)]
#[case(ForkName::Altair)]
#[case(ForkName::Bellatrix)]
#[case(ForkName::Capella)]
#[case(ForkName::Deneb)]
#[case(ForkName::Electra)]
#[case(ForkName::Fulu)]
fn test_every_fork_yields_the_same_canonical_fields(#[case] fork: ForkName) {
    let (block, attestations) = normalize(&raw(fork, SLOT), &MAINNET_SPEC).unwrap();
    let (reference, reference_attestations) =
        normalize(&raw(ForkName::Phase0, SLOT), &MAINNET_SPEC).unwrap();

    assert_eq!(block.fork, fork);
    assert_eq!(block.slot, SLOT);
    assert_eq!(block.epoch, SLOT / 32);
    assert_eq!(block.proposer_index, fixtures::proposer_index(SLOT));
    assert_eq!(block.parent_root, reference.parent_root);
    assert_eq!(block.state_root, reference.state_root);
    assert_eq!(block.randao_reveal, reference.randao_reveal);
    assert_eq!(block.graffiti, reference.graffiti);
    assert_eq!(block.signature, reference.signature);
    assert_eq!(block.eth1_block_hash, reference.eth1_block_hash);
    assert_eq!(block.eth1_deposit_count, Some(4_096));
    assert_eq!(block.proposer_slashings, 1);
    assert_eq!(block.attester_slashings, 2);

    assert_eq!(attestations.len(), ATTESTATIONS_PER_BLOCK);
    assert_eq!(attestations, reference_attestations);
}

#[rstest]
#[case(ForkName::Phase0, false)]
#[case(ForkName::Altair, false)]
#[case(ForkName::Bellatrix, true)]
#[case(ForkName::Capella, true)]
#[case(ForkName::Deneb, true)]
#[case(ForkName::Electra, true)]
#[case(ForkName::Fulu, true)]
fn test_execution_linkage_only_after_the_merge(#[case] fork: ForkName, #[case] merged: bool) {
    let (block, _) = normalize(&raw(fork, SLOT), &MAINNET_SPEC).unwrap();

    if merged {
        assert_eq!(
            block.execution_block_hash,
            Some(hex_string(fixtures::root(SLOT, 0xee)))
        );
        assert_eq!(
            block.execution_block_number,
            Some(fixtures::execution_block_number(SLOT))
        );
    } else {
        assert_eq!(block.execution_block_hash, None);
        assert_eq!(block.execution_block_number, None);
    }
}

#[test]
fn test_attestations_are_indexed_by_position() {
    let (_, attestations) = normalize(&raw(ForkName::Deneb, SLOT), &MAINNET_SPEC).unwrap();

    let positions: Vec<u64> = attestations.iter().map(|a| a.attest_index).collect();
    assert_eq!(positions, vec![0, 1]);
    assert!(attestations.iter().all(|a| a.slot == SLOT));
    assert_eq!(attestations[1].committee_index, 1);
    assert_eq!(attestations[0].aggregation_bits, "0x0301");
}

#[test]
fn test_electra_committee_index_comes_from_committee_bits() {
    let block = fixtures::signed_block(ForkName::Electra, SLOT);
    let VersionedSignedBlock::Electra(ref signed) = block else {
        panic!("expected electra block");
    };
    assert!(signed
        .message
        .body
        .attestations
        .iter()
        .all(|a| a.data.index == 0));

    let (_, attestations) = normalizer::normalize_block(&block, &MAINNET_SPEC);
    let committees: Vec<u64> = attestations.iter().map(|a| a.committee_index).collect();
    assert_eq!(committees, vec![0, 1]);
}

#[rstest]
#[case(ForkName::Phase0)]
#[case(ForkName::Electra)]
#[case(ForkName::Fulu)]
fn test_missing_attestations_yield_an_empty_list(#[case] fork: ForkName) {
    let mut raw = raw(fork, SLOT);
    raw.data["message"]["body"]
        .as_object_mut()
        .unwrap()
        .remove("attestations");

    let (block, attestations) = normalize(&raw, &MAINNET_SPEC).unwrap();
    assert_eq!(block.slot, SLOT);
    assert!(attestations.is_empty());
}

#[test]
fn test_epoch_follows_the_network_constant() {
    let spec = ChainSpec {
        slots_per_epoch: 8,
        seconds_per_slot: 6,
    };
    let (block, _) = normalize(&raw(ForkName::Capella, 17), &spec).unwrap();
    assert_eq!(block.epoch, 2);
}

#[test]
fn test_unknown_version_is_reported() {
    let raw = RawBlock {
        version: "gloas".to_string(),
        data: json!({}),
    };
    match normalize(&raw, &MAINNET_SPEC) {
        Err(NormalizeError::UnknownVersion(version)) => assert_eq!(version, "gloas"),
        other => panic!("expected UnknownVersion, got {other:?}"),
    }
}

#[test]
fn test_malformed_payload_names_its_fork() {
    let mut raw = raw(ForkName::Bellatrix, SLOT);
    raw.data["message"]["body"]
        .as_object_mut()
        .unwrap()
        .remove("execution_payload");

    match normalize(&raw, &MAINNET_SPEC) {
        Err(NormalizeError::Malformed { fork, .. }) => assert_eq!(fork, ForkName::Bellatrix),
        other => panic!("expected Malformed, got {other:?}"),
    }
}
