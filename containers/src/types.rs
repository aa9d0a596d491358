use alloy_primitives::{FixedBytes, B256};

/// 32-byte SSZ root (block, state, body or checkpoint root).
pub type Root = B256;

/// Compressed BLS12-381 G2 point.
pub type BlsSignature = FixedBytes<96>;

/// Compressed BLS12-381 G1 point.
pub type BlsPubkey = FixedBytes<48>;

/// Render bytes the way the beacon API does: lowercase, `0x`-prefixed.
pub fn hex_string(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}
