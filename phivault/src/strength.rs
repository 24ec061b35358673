//! Coarse sanity filter for candidate keys.
//!
//! Rejects keys that are obviously degenerate. Passing this filter is not
//! evidence of proper random generation; it only catches placeholder and
//! zeroed keys before they reach production.

use crate::key::KEY_SIZE;

/// Returns `true` if the candidate hex key passes the sanity filter.
///
/// Rejected outright: unparseable hex, any length other than 32 bytes,
/// an all-zero buffer, or a single byte value repeated across the whole
/// buffer. A key that cannot be parsed is never approved.
#[must_use]
pub fn is_strong(candidate_hex: &str) -> bool {
    let Ok(bytes) = hex::decode(candidate_hex) else {
        return false;
    };
    if bytes.len() != KEY_SIZE {
        return false;
    }
    // All-zero is a special case of a repeated byte, checked together
    bytes.windows(2).any(|pair| pair[0] != pair[1])
}
