//! Function selectors and event topics.
//!
//! Both are keccak256 of the canonical signature string:
//!   selector(`transfer(address,uint256)`)           → 0xa9059cbb
//!   topic(`Transfer(address,address,uint256)`)      → 0xddf252ad…b3ef
//!
//! For receipt logs, topics[0] IS the event topic, so it is compared rather
//! than recomputed from the log.

use tiny_keccak::{Hasher, Keccak};

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(bytes);
    hasher.finalize(&mut output);
    output
}

/// First four bytes of keccak256(signature).
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `0x`-prefixed keccak256(signature), as it appears in `topics[0]`.
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

/// Topic0 of a raw log, if it looks like a 32-byte hex hash.
pub fn from_topics(topics: &[String]) -> Option<&str> {
    let first = topics.first()?;
    let hex = first.strip_prefix("0x").unwrap_or(first);
    if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(first.as_str())
    } else {
        None
    }
}

/// Case-insensitive topic comparison, tolerant of a missing `0x`.
pub fn same_topic(a: &str, b: &str) -> bool {
    let a = a.strip_prefix("0x").unwrap_or(a);
    let b = b.strip_prefix("0x").unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}
