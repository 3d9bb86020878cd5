//! Deterministic join aliases
//!
//! Every join path gets a short alias: the base-36 rendering of a 53-bit
//! cyrb53 hash of its hop signatures. Equal hop sequences always produce the
//! same alias, in any process, so independently planned queries agree on how
//! a joined dataset is addressed.
//!
//! ## Format
//!
//! ```text
//! hops:      [orders.customer_id -> customers.id]
//! signature: "orders_customer_id_customers_id"
//! alias:     base36(cyrb53(signature)) = "24ihmn0mjfg"
//! ```
//!
//! The empty path is never hashed; it maps to [`BASE_DATASET_ALIAS`].

use crate::dataset_graph::JoinPath;

/// Alias of the base dataset itself (the empty path).
///
/// Reserved constant; it equals `base36(cyrb53(""))` so aliases stay
/// compatible with plans produced by the chart front end.
pub const BASE_DATASET_ALIAS: &str = "wvjl67o803";

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 53-bit cyrb53 hash over the UTF-16 code units of `input`.
pub fn cyrb53(input: &str, seed: u32) -> u64 {
    let mut h1: u32 = 0xdead_beef ^ seed;
    let mut h2: u32 = 0x41c6_ce57 ^ seed;
    for unit in input.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ ch).wrapping_mul(1_597_334_677);
    }
    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507);
    h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507);
    h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);

    (u64::from(h2 & 0x001f_ffff) << 32) | u64::from(h1)
}

/// Lowercase base-36 rendering.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Alias for a join path.
pub fn encode_path(path: &[JoinPath]) -> String {
    if path.is_empty() {
        return BASE_DATASET_ALIAS.to_string();
    }
    let signature = path.iter().map(JoinPath::signature).collect::<Vec<_>>().join("_");
    to_base36(cyrb53(&signature, 0))
}

/// `<alias>.<fid>`, the column address of `fid` in the joined result.
pub fn qualify_fid(path: &[JoinPath], fid: &str) -> String {
    format!("{}.{}", encode_path(path), fid)
}
