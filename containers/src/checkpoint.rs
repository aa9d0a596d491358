use serde::{Deserialize, Serialize};

use crate::serde_helpers::quoted_u64;
use crate::types::Root;

/// An epoch boundary block, the unit of justification and finalization.
///
/// Attestations vote for a `source` and a `target` checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(with = "quoted_u64")]
    pub epoch: u64,
    pub root: Root,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_api_shape() {
        let root = format!("0x{}", "11".repeat(32));
        let checkpoint: Checkpoint =
            serde_json::from_value(json!({ "epoch": "12", "root": root })).unwrap();
        assert_eq!(checkpoint.epoch, 12);
        assert_eq!(checkpoint.root, Root::repeat_byte(0x11));
    }
}
