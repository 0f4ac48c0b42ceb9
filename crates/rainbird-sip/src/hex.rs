//! Fixed-width hexadecimal rendering used by every SIP field.

use crate::error::{Result, SipError};

/// Render `value` as uppercase hex, left-padded with `0` to `min_width`.
///
/// Values wider than `min_width` are rendered in full; the frame length
/// check is what catches them.
pub fn to_hex(value: u64, min_width: usize) -> String {
    format!("{value:0min_width$X}")
}

/// Parse unsigned hexadecimal text (either case).
pub fn from_hex(text: &str) -> Result<u64> {
    if text.is_empty() || !is_hex(text) {
        return Err(SipError::MalformedHex(text.to_string()));
    }
    u64::from_str_radix(text, 16).map_err(|_| SipError::MalformedHex(text.to_string()))
}

/// True when every character of `text` is an ASCII hex digit.
pub fn is_hex(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_hexdigit())
}
