//! 32-byte field elements as they appear on the wire.

use crate::layout::FIELD_HEX_WIDTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a field element in bytes.
pub const FIELD_BYTES: usize = FIELD_HEX_WIDTH / 2;

/// Big-endian encoding of one field element.
///
/// No modular reduction is applied; this is a wire value, not arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldElement(pub [u8; FIELD_BYTES]);

impl FieldElement {
    /// The zero element.
    pub const ZERO: Self = Self([0u8; FIELD_BYTES]);

    /// Left-pad a `u128` into big-endian form.
    #[must_use]
    pub fn from_u128(v: u128) -> Self {
        let mut out = [0u8; FIELD_BYTES];
        out[FIELD_BYTES - 16..].copy_from_slice(&v.to_be_bytes());
        Self(out)
    }

    /// Left-pad up to 32 big-endian bytes. Returns `None` if `bytes` is longer.
    #[must_use]
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > FIELD_BYTES {
            return None;
        }
        let mut out = [0u8; FIELD_BYTES];
        out[FIELD_BYTES - bytes.len()..].copy_from_slice(bytes);
        Some(Self(out))
    }

    /// Raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    /// Lowercase hex, always [`FIELD_HEX_WIDTH`] characters.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for FieldElement {
    type Err = hex::FromHexError;

    /// Accepts exactly 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; FIELD_BYTES];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}
