//! Fork-independent records, the shape blocks take once normalized.

use serde::{Deserialize, Serialize};

use crate::block::ForkName;

/// One row per slot. Byte fields are `0x`-prefixed lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockRecord {
    pub slot: u64,
    pub epoch: u64,
    pub proposer_index: u64,
    pub parent_root: String,
    pub state_root: String,
    pub randao_reveal: String,
    pub graffiti: String,
    pub eth1_block_hash: Option<String>,
    pub eth1_deposit_root: Option<String>,
    pub eth1_deposit_count: Option<u64>,
    /// Execution payload linkage, `None` before the merge.
    pub execution_block_hash: Option<String>,
    pub execution_block_number: Option<u64>,
    pub signature: String,
    pub proposer_slashings: u64,
    pub attester_slashings: u64,
    pub fork: ForkName,
}

/// One row per attestation, `attest_index` being its position in the body.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub slot: u64,
    pub attest_index: u64,
    pub aggregation_bits: String,
    pub beacon_block_root: String,
    pub committee_index: u64,
    pub source_epoch: u64,
    pub source_root: String,
    pub target_epoch: u64,
    pub target_root: String,
    pub signature: String,
}
