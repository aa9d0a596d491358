use std::fmt;
use std::str::FromStr;

use containers::{Root, hex_string};

/// Identifier accepted by the `blocks/{block_id}` and `headers/{block_id}`
/// endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockId {
    Slot(u64),
    Head,
    Genesis,
    Finalized,
    Root(Root),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Slot(slot) => write!(f, "{slot}"),
            BlockId::Head => f.write_str("head"),
            BlockId::Genesis => f.write_str("genesis"),
            BlockId::Finalized => f.write_str("finalized"),
            BlockId::Root(root) => f.write_str(&hex_string(root)),
        }
    }
}

impl From<u64> for BlockId {
    fn from(slot: u64) -> Self {
        BlockId::Slot(slot)
    }
}

impl FromStr for BlockId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(BlockId::Head),
            "genesis" => Ok(BlockId::Genesis),
            "finalized" => Ok(BlockId::Finalized),
            _ if s.starts_with("0x") => s
                .parse::<Root>()
                .map(BlockId::Root)
                .map_err(|err| format!("invalid block root {s:?}: {err}")),
            _ => s
                .parse::<u64>()
                .map(BlockId::Slot)
                .map_err(|err| format!("invalid block id {s:?}: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_path_segments() {
        assert_eq!(BlockId::Slot(12).to_string(), "12");
        assert_eq!(BlockId::Head.to_string(), "head");
        assert_eq!(
            BlockId::Root(Root::repeat_byte(0xab)).to_string(),
            format!("0x{}", "ab".repeat(32))
        );
    }

    #[test]
    fn test_parses_every_form() {
        assert_eq!("finalized".parse::<BlockId>(), Ok(BlockId::Finalized));
        assert_eq!("genesis".parse::<BlockId>(), Ok(BlockId::Genesis));
        assert_eq!("77".parse::<BlockId>(), Ok(BlockId::Slot(77)));
        let root = format!("0x{}", "01".repeat(32));
        assert_eq!(
            root.parse::<BlockId>(),
            Ok(BlockId::Root(Root::repeat_byte(0x01)))
        );
        assert!("0x12".parse::<BlockId>().is_err());
        assert!("tip".parse::<BlockId>().is_err());
    }
}
