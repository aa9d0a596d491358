use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;
use crate::phase0::SignedBeaconBlockHeader;
use crate::serde_helpers::quoted_u64;
use crate::types::{BlsSignature, Root};
use crate::{altair, bellatrix, capella, deneb, electra, fulu, phase0};

/// Consensus-layer upgrades, oldest first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ForkName {
    #[default]
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
    Fulu,
}

impl ForkName {
    pub const ALL: [ForkName; 7] = [
        ForkName::Phase0,
        ForkName::Altair,
        ForkName::Bellatrix,
        ForkName::Capella,
        ForkName::Deneb,
        ForkName::Electra,
        ForkName::Fulu,
    ];

    /// Tag used by the beacon API `version` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForkName::Phase0 => "phase0",
            ForkName::Altair => "altair",
            ForkName::Bellatrix => "bellatrix",
            ForkName::Capella => "capella",
            ForkName::Deneb => "deneb",
            ForkName::Electra => "electra",
            ForkName::Fulu => "fulu",
        }
    }

    pub fn has_execution_payload(&self) -> bool {
        *self >= ForkName::Bellatrix
    }
}

impl fmt::Display for ForkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForkName {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForkName::ALL
            .into_iter()
            .find(|fork| fork.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DecodeError::UnknownVersion(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeaconBlock<Body> {
    #[serde(with = "quoted_u64")]
    pub slot: u64,
    #[serde(with = "quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: Body,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignedBeaconBlock<Body> {
    pub message: BeaconBlock<Body>,
    pub signature: BlsSignature,
}

/// Block as returned by `GET /eth/v2/beacon/blocks/{block_id}`: a version tag
/// next to an untyped payload whose layout depends on that tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub version: String,
    pub data: Value,
}

/// A signed block decoded into the containers of exactly one fork.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionedSignedBlock {
    Phase0(phase0::SignedBeaconBlock),
    Altair(altair::SignedBeaconBlock),
    Bellatrix(bellatrix::SignedBeaconBlock),
    Capella(capella::SignedBeaconBlock),
    Deneb(deneb::SignedBeaconBlock),
    Electra(electra::SignedBeaconBlock),
    Fulu(fulu::SignedBeaconBlock),
}

impl VersionedSignedBlock {
    /// Decode the payload according to its version tag.
    ///
    /// The tag alone selects the layout. A payload that does not match the
    /// layout of its tag is `Malformed`, never retried as another fork.
    pub fn decode(raw: &RawBlock) -> Result<Self, DecodeError> {
        let fork = raw.version.parse::<ForkName>()?;
        let malformed = |source: serde_json::Error| DecodeError::Malformed { fork, source };

        let block = match fork {
            ForkName::Phase0 => {
                Self::Phase0(Deserialize::deserialize(&raw.data).map_err(malformed)?)
            }
            ForkName::Altair => {
                Self::Altair(Deserialize::deserialize(&raw.data).map_err(malformed)?)
            }
            ForkName::Bellatrix => {
                Self::Bellatrix(Deserialize::deserialize(&raw.data).map_err(malformed)?)
            }
            ForkName::Capella => {
                Self::Capella(Deserialize::deserialize(&raw.data).map_err(malformed)?)
            }
            ForkName::Deneb => Self::Deneb(Deserialize::deserialize(&raw.data).map_err(malformed)?),
            ForkName::Electra => {
                Self::Electra(Deserialize::deserialize(&raw.data).map_err(malformed)?)
            }
            ForkName::Fulu => Self::Fulu(Deserialize::deserialize(&raw.data).map_err(malformed)?),
        };

        Ok(block)
    }

    pub fn fork(&self) -> ForkName {
        match self {
            Self::Phase0(_) => ForkName::Phase0,
            Self::Altair(_) => ForkName::Altair,
            Self::Bellatrix(_) => ForkName::Bellatrix,
            Self::Capella(_) => ForkName::Capella,
            Self::Deneb(_) => ForkName::Deneb,
            Self::Electra(_) => ForkName::Electra,
            Self::Fulu(_) => ForkName::Fulu,
        }
    }

    pub fn slot(&self) -> u64 {
        match self {
            Self::Phase0(block) => block.message.slot,
            Self::Altair(block) => block.message.slot,
            Self::Bellatrix(block) => block.message.slot,
            Self::Capella(block) => block.message.slot,
            Self::Deneb(block) => block.message.slot,
            Self::Electra(block) | Self::Fulu(block) => block.message.slot,
        }
    }

    /// Re-encode into the API envelope, as a node would serve it.
    pub fn to_raw(&self) -> Result<RawBlock, serde_json::Error> {
        let data = match self {
            Self::Phase0(block) => serde_json::to_value(block)?,
            Self::Altair(block) => serde_json::to_value(block)?,
            Self::Bellatrix(block) => serde_json::to_value(block)?,
            Self::Capella(block) => serde_json::to_value(block)?,
            Self::Deneb(block) => serde_json::to_value(block)?,
            Self::Electra(block) | Self::Fulu(block) => serde_json::to_value(block)?,
        };

        Ok(RawBlock {
            version: self.fork().as_str().to_string(),
            data,
        })
    }
}

/// Entry of `GET /eth/v1/beacon/headers/{block_id}`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    pub root: Root,
    #[serde(default)]
    pub canonical: bool,
    pub header: SignedBeaconBlockHeader,
}

impl BlockHeader {
    pub fn slot(&self) -> u64 {
        self.header.message.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("phase0", ForkName::Phase0)]
    #[case("altair", ForkName::Altair)]
    #[case("BELLATRIX", ForkName::Bellatrix)]
    #[case("capella", ForkName::Capella)]
    #[case("deneb", ForkName::Deneb)]
    #[case("Electra", ForkName::Electra)]
    #[case("fulu", ForkName::Fulu)]
    fn test_parses_version_tags(#[case] tag: &str, #[case] expected: ForkName) {
        assert_eq!(tag.parse::<ForkName>().unwrap(), expected);
    }

    #[test]
    fn test_rejects_unknown_version_tag() {
        let raw = RawBlock {
            version: "gloas".to_string(),
            data: json!({}),
        };
        match VersionedSignedBlock::decode(&raw) {
            Err(DecodeError::UnknownVersion(tag)) => assert_eq!(tag, "gloas"),
            other => panic!("expected UnknownVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_not_matching_its_tag_is_malformed() {
        let raw = RawBlock {
            version: "deneb".to_string(),
            data: json!({ "message": { "slot": "1" } }),
        };
        match VersionedSignedBlock::decode(&raw) {
            Err(DecodeError::Malformed { fork, .. }) => assert_eq!(fork, ForkName::Deneb),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_execution_payload_starts_at_bellatrix() {
        assert!(!ForkName::Altair.has_execution_payload());
        assert!(ForkName::Bellatrix.has_execution_payload());
        assert!(ForkName::Fulu.has_execution_payload());
    }

    #[test]
    fn test_decodes_header_response_entry() {
        let zero = format!("0x{}", "00".repeat(32));
        let header: BlockHeader = serde_json::from_value(json!({
            "root": zero,
            "canonical": true,
            "header": {
                "message": {
                    "slot": "42",
                    "proposer_index": "7",
                    "parent_root": zero,
                    "state_root": zero,
                    "body_root": zero,
                },
                "signature": format!("0x{}", "00".repeat(96)),
            }
        }))
        .unwrap();
        assert_eq!(header.slot(), 42);
        assert!(header.canonical);
    }

    #[test]
    fn test_every_fork_survives_the_api_envelope() {
        for fork in ForkName::ALL {
            let block = crate::fixtures::signed_block(fork, 321);
            let raw = block.to_raw().unwrap();
            assert_eq!(raw.version, fork.as_str());

            let decoded = VersionedSignedBlock::decode(&raw).unwrap();
            assert_eq!(decoded.fork(), fork);
            assert_eq!(decoded.slot(), 321);
            assert_eq!(decoded, block);
        }
    }
}
