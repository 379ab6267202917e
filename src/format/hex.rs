//! Hex text for keys, engine IDs and KeyChange strings.
//!
//! Output is always lowercase. Input may be either case and may carry a
//! `0x` prefix, as engine IDs often do in agent configuration.

use std::fmt::{self, Write};

/// Lowercase hex of `bytes`.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    // Writing to a String cannot fail.
    let _ = write!(out, "{}", Bytes(bytes));
    out
}

/// Parse hex text, with or without a `0x`/`0X` prefix.
///
/// ```
/// use usm_keytools::format::hex::{DecodeError, decode};
///
/// assert_eq!(decode("0x80001f8880").unwrap(), [0x80, 0x00, 0x1f, 0x88, 0x80]);
/// assert_eq!(decode("8000000"), Err(DecodeError::OddLength));
/// ```
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
        .as_bytes();
    if !digits.len().is_multiple_of(2) {
        return Err(DecodeError::OddLength);
    }
    digits
        .chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn nibble(c: u8) -> Result<u8, DecodeError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(DecodeError::InvalidChar),
    }
}

/// Why hex text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Digits do not pair up into bytes.
    OddLength,
    /// A character outside `[0-9a-fA-F]`.
    InvalidChar,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength => write!(f, "odd number of hex digits"),
            Self::InvalidChar => write!(f, "invalid hex character"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Formats a byte slice as hex on demand, for log fields and `Display`
/// impls that should not allocate.
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{:02x}", b))
    }
}

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
