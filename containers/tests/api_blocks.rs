use containers::{ForkName, RawBlock, VersionedSignedBlock};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn hex(byte: &str, len: usize) -> String {
    format!("0x{}", byte.repeat(len))
}

fn checkpoint(epoch: &str) -> Value {
    json!({ "epoch": epoch, "root": hex("cc", 32) })
}

fn phase0_body() -> Value {
    json!({
        "randao_reveal": hex("aa", 96),
        "eth1_data": {
            "deposit_root": hex("d0", 32),
            "deposit_count": "21004",
            "block_hash": hex("e1", 32),
        },
        "graffiti": hex("00", 32),
        "proposer_slashings": [],
        "attester_slashings": [],
        "attestations": [{
            "aggregation_bits": "0xff3f",
            "data": {
                "slot": "99",
                "index": "3",
                "beacon_block_root": hex("bb", 32),
                "source": checkpoint("2"),
                "target": checkpoint("3"),
            },
            "signature": hex("ab", 96),
        }],
        "deposits": [],
        "voluntary_exits": [],
    })
}

fn envelope(version: &str, body: Value) -> RawBlock {
    RawBlock {
        version: version.to_string(),
        data: json!({
            "message": {
                "slot": "100",
                "proposer_index": "12",
                "parent_root": hex("01", 32),
                "state_root": hex("02", 32),
                "body": body,
            },
            "signature": hex("99", 96),
        }),
    }
}

#[test]
fn test_decodes_phase0_api_response() {
    let block = VersionedSignedBlock::decode(&envelope("phase0", phase0_body())).unwrap();
    assert_eq!(block.fork(), ForkName::Phase0);
    assert_eq!(block.slot(), 100);

    let VersionedSignedBlock::Phase0(block) = block else {
        panic!("expected phase0 block");
    };
    let attestation = &block.message.body.attestations[0];
    assert_eq!(attestation.data.index, 3);
    assert_eq!(attestation.data.target.epoch, 3);
    assert_eq!(attestation.aggregation_bits.as_ref(), &[0xff, 0x3f]);
    assert_eq!(block.message.body.eth1_data.deposit_count, 21004);
}

#[test]
fn test_altair_requires_sync_aggregate() {
    let result = VersionedSignedBlock::decode(&envelope("altair", phase0_body()));
    assert!(result.is_err());

    let mut body = phase0_body();
    body["sync_aggregate"] = json!({
        "sync_committee_bits": hex("ff", 64),
        "sync_committee_signature": hex("ac", 96),
    });
    let block = VersionedSignedBlock::decode(&envelope("altair", body)).unwrap();
    assert_eq!(block.fork(), ForkName::Altair);
}

#[test]
fn test_missing_attestation_list_decodes_as_empty() {
    let mut body = phase0_body();
    body.as_object_mut().unwrap().remove("attestations");
    let block = VersionedSignedBlock::decode(&envelope("phase0", body)).unwrap();
    let VersionedSignedBlock::Phase0(block) = block else {
        panic!("expected phase0 block");
    };
    assert!(block.message.body.attestations.is_empty());
}
