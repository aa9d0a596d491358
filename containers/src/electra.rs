//! Electra moves the committee index out of `AttestationData` into a
//! `committee_bits` bitvector and adds execution-layer triggered requests.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::altair::SyncAggregate;
use crate::block;
use crate::capella::SignedBlsToExecutionChange;
use crate::deneb::{ExecutionPayload, KzgCommitment};
use crate::phase0::{
    AttestationData, AttesterSlashing, Deposit, Eth1Data, ProposerSlashing, SignedVoluntaryExit,
};
use crate::serde_helpers::quoted_u64;
use crate::types::{BlsPubkey, BlsSignature};

/// On-chain aggregate spanning one or more committees of the same slot.
///
/// `data.index` is always zero from Electra on; the committees that took part
/// are the set bits of `committee_bits`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attestation {
    pub aggregation_bits: Bytes,
    pub data: AttestationData,
    pub signature: BlsSignature,
    pub committee_bits: Bytes,
}

impl Attestation {
    /// Lowest committee index whose bit is set, little-endian bit order.
    pub fn first_committee_index(&self) -> Option<u64> {
        self.committee_bits
            .iter()
            .enumerate()
            .find(|(_, byte)| **byte != 0)
            .map(|(position, byte)| position as u64 * 8 + u64::from(byte.trailing_zeros()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepositRequest {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: B256,
    #[serde(with = "quoted_u64")]
    pub amount: u64,
    pub signature: BlsSignature,
    #[serde(with = "quoted_u64")]
    pub index: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub source_address: Address,
    pub validator_pubkey: BlsPubkey,
    #[serde(with = "quoted_u64")]
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsolidationRequest {
    pub source_address: Address,
    pub source_pubkey: BlsPubkey,
    pub target_pubkey: BlsPubkey,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionRequests {
    #[serde(default)]
    pub deposits: Vec<DepositRequest>,
    #[serde(default)]
    pub withdrawals: Vec<WithdrawalRequest>,
    #[serde(default)]
    pub consolidations: Vec<ConsolidationRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: B256,
    #[serde(default)]
    pub proposer_slashings: Vec<ProposerSlashing>,
    #[serde(default)]
    pub attester_slashings: Vec<AttesterSlashing>,
    #[serde(default)]
    pub attestations: Vec<Attestation>,
    #[serde(default)]
    pub deposits: Vec<Deposit>,
    #[serde(default)]
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
    #[serde(default)]
    pub bls_to_execution_changes: Vec<SignedBlsToExecutionChange>,
    #[serde(default)]
    pub blob_kzg_commitments: Vec<KzgCommitment>,
    #[serde(default)]
    pub execution_requests: ExecutionRequests,
}

pub type BeaconBlock = block::BeaconBlock<BeaconBlockBody>;
pub type SignedBeaconBlock = block::SignedBeaconBlock<BeaconBlockBody>;
