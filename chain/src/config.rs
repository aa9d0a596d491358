use std::collections::HashMap;

use tracing::warn;

pub const SLOTS_PER_EPOCH_KEY: &str = "SLOTS_PER_EPOCH";
pub const SECONDS_PER_SLOT_KEY: &str = "SECONDS_PER_SLOT";

pub const DEFAULT_SLOTS_PER_EPOCH: u64 = 32;
pub const DEFAULT_SECONDS_PER_SLOT: u64 = 12;

/// Network constants the scanner needs to derive canonical records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainSpec {
    pub slots_per_epoch: u64,
    pub seconds_per_slot: u64,
}

pub const MAINNET_SPEC: ChainSpec = ChainSpec {
    slots_per_epoch: DEFAULT_SLOTS_PER_EPOCH,
    seconds_per_slot: DEFAULT_SECONDS_PER_SLOT,
};

impl ChainSpec {
    /// Build a spec from the node's `/eth/v1/config/spec` constants.
    ///
    /// Missing or unparsable values fall back to the mainnet defaults. A zero
    /// `SLOTS_PER_EPOCH` is rejected the same way since it would make every
    /// epoch computation divide by zero.
    pub fn from_constants(constants: &HashMap<String, String>) -> Self {
        let slots_per_epoch = match read_u64(constants, SLOTS_PER_EPOCH_KEY) {
            Some(0) | None => DEFAULT_SLOTS_PER_EPOCH,
            Some(value) => value,
        };
        let seconds_per_slot =
            read_u64(constants, SECONDS_PER_SLOT_KEY).unwrap_or(DEFAULT_SECONDS_PER_SLOT);

        Self {
            slots_per_epoch,
            seconds_per_slot,
        }
    }

    pub fn epoch_at_slot(&self, slot: u64) -> u64 {
        slot / self.slots_per_epoch
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        MAINNET_SPEC
    }
}

fn read_u64(constants: &HashMap<String, String>, key: &str) -> Option<u64> {
    let raw = constants.get(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, value = %raw, %err, "Ignoring non-integer chain constant");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn constants(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_constants_missing() {
        let spec = ChainSpec::from_constants(&HashMap::new());
        assert_eq!(spec, MAINNET_SPEC);
    }

    #[test]
    fn test_reads_node_constants() {
        let spec = ChainSpec::from_constants(&constants(&[
            ("SLOTS_PER_EPOCH", "8"),
            ("SECONDS_PER_SLOT", "6"),
        ]));
        assert_eq!(spec.slots_per_epoch, 8);
        assert_eq!(spec.seconds_per_slot, 6);
        assert_eq!(spec.epoch_at_slot(17), 2);
    }

    #[test]
    fn test_zero_or_garbage_slots_per_epoch_falls_back() {
        let zero = ChainSpec::from_constants(&constants(&[("SLOTS_PER_EPOCH", "0")]));
        assert_eq!(zero.slots_per_epoch, DEFAULT_SLOTS_PER_EPOCH);

        let garbage = ChainSpec::from_constants(&constants(&[("SLOTS_PER_EPOCH", "thirty")]));
        assert_eq!(garbage.slots_per_epoch, DEFAULT_SLOTS_PER_EPOCH);
    }

    #[test]
    fn test_epoch_math_uses_mainnet_constant() {
        let spec = ChainSpec::default();
        assert_eq!(spec.epoch_at_slot(0), 0);
        assert_eq!(spec.epoch_at_slot(31), 0);
        assert_eq!(spec.epoch_at_slot(32), 1);
    }
}
