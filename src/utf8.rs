//! Restricted UTF-8 well-formedness validator (§4.2).
//!
//! `std::str::from_utf8` already rejects overlong encodings and surrogate
//! halves, so in practice it agrees with the byte-range table this module
//! documents. This module exists as a standalone, table-driven check so the
//! acceptance ranges are explicit and independently testable, matching how
//! the distilled specification states them.

/// Returns `true` iff `bytes` is well-formed UTF-8 under the restricted
/// ranges in §4.2. An empty input is valid.
#[must_use]
pub fn is_well_formed(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let Some(len) = sequence_len(&bytes[i..]) else {
            return false;
        };
        i += len;
    }
    true
}

/// Returns the byte length of the well-formed sequence starting at the
/// front of `bytes`, or `None` if no table row matches.
fn sequence_len(bytes: &[u8]) -> Option<usize> {
    let b0 = *bytes.first()?;
    match b0 {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => {
            let b1 = *bytes.get(1)?;
            matches!(b1, 0x80..=0xbf).then_some(2)
        }
        0xe0 => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            (matches!(b1, 0xa0..=0xbf) && matches!(b2, 0x80..=0xbf)).then_some(3)
        }
        0xe1..=0xec => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            (matches!(b1, 0x80..=0xbf) && matches!(b2, 0x80..=0xbf)).then_some(3)
        }
        0xed => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            (matches!(b1, 0x80..=0x9f) && matches!(b2, 0x80..=0xbf)).then_some(3)
        }
        0xee..=0xef => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            (matches!(b1, 0x80..=0xbf) && matches!(b2, 0x80..=0xbf)).then_some(3)
        }
        0xf0 => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            let b3 = *bytes.get(3)?;
            (matches!(b1, 0x90..=0xbf) && matches!(b2, 0x80..=0xbf) && matches!(b3, 0x80..=0xbf)).then_some(4)
        }
        0xf1..=0xf3 => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            let b3 = *bytes.get(3)?;
            (matches!(b1, 0x80..=0xbf) && matches!(b2, 0x80..=0xbf) && matches!(b3, 0x80..=0xbf)).then_some(4)
        }
        0xf4 => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            let b3 = *bytes.get(3)?;
            (matches!(b1, 0x80..=0x8f) && matches!(b2, 0x80..=0xbf) && matches!(b3, 0x80..=0xbf)).then_some(4)
        }
        _ => None,
    }
}
