//! Checksum arithmetic for the text framing.

/// Decode a two-hex-digit checksum term into the parity value it claims.
///
/// Conversion is permissive: a non-hex digit decodes through the digit
/// branch regardless, landing outside the 0..=255 range an XOR parity can
/// take, so a malformed checksum term fails validation without erroring.
/// A missing digit reads as NUL.
pub(super) fn expected_parity(term: &[u8]) -> i32 {
    let hi = term.first().copied().unwrap_or(0);
    let lo = term.get(1).copied().unwrap_or(0);
    16 * hex_value(hi) + hex_value(lo)
}

fn hex_value(byte: u8) -> i32 {
    match byte {
        b'A'..=b'F' => i32::from(byte - b'A') + 10,
        b'a'..=b'f' => i32::from(byte - b'a') + 10,
        _ => i32::from(byte) - i32::from(b'0'),
    }
}
