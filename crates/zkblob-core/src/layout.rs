//! Region boundaries of the combined proof blob.
//!
//! Wire format, in hex characters from offset 0:
//!
//! | region        | width                       |
//! |---------------|-----------------------------|
//! | header        | [`HEADER_HEX_WIDTH`]        |
//! | commitments   | [`COMMITMENTS_HEX_WIDTH`]   |
//! | public inputs | `N * FIELD_HEX_WIDTH`       |
//! | proof tail    | remainder                   |
//!
//! `N` is the circuit's public field count; the blob is never inspected to
//! find it.

use crate::abi::Circuit;
use crate::error::AbiError;
use serde::{Deserialize, Serialize};

/// Hex characters per field element (32 bytes, BN254 scalar width).
pub const FIELD_HEX_WIDTH: usize = 64;

/// Hex characters of the backend metadata header (4 bytes).
pub const HEADER_HEX_WIDTH: usize = 8;

/// Commitments the backend places ahead of the public inputs.
pub const COMMITMENT_COUNT: usize = 3;

/// Hex characters taken by the commitment slots.
pub const COMMITMENTS_HEX_WIDTH: usize = COMMITMENT_COUNT * FIELD_HEX_WIDTH;

/// Offset at which the public-input region starts.
pub const HEADER_END: usize = HEADER_HEX_WIDTH + COMMITMENTS_HEX_WIDTH;

/// Offsets derived from a public field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLayout {
    /// `N`.
    pub public_field_count: usize,
    /// End of header + commitments; start of the public inputs.
    pub header_end: usize,
    /// End of the public inputs; start of the proof tail.
    pub public_inputs_end: usize,
}

impl BlobLayout {
    /// Layout for `n` public field elements.
    ///
    /// Returns `None` if the offsets overflow `usize`.
    #[must_use]
    pub const fn checked(n: usize) -> Option<Self> {
        match n.checked_mul(FIELD_HEX_WIDTH) {
            Some(width) => match HEADER_END.checked_add(width) {
                Some(end) => Some(Self {
                    public_field_count: n,
                    header_end: HEADER_END,
                    public_inputs_end: end,
                }),
                None => None,
            },
            None => None,
        }
    }

    /// Layout for a circuit's ABI.
    pub fn for_circuit(circuit: &Circuit) -> Result<Self, AbiError> {
        let n = circuit.public_field_count()?;
        Self::checked(n).ok_or(AbiError::CountOverflow)
    }

    /// Hex width of the public-input region.
    #[inline]
    #[must_use]
    pub const fn public_inputs_hex_len(&self) -> usize {
        self.public_inputs_end - self.header_end
    }

    /// Total blob length for a proof tail of `tail_hex_len` characters.
    #[inline]
    #[must_use]
    pub const fn expected_len(&self, tail_hex_len: usize) -> usize {
        self.public_inputs_end + tail_hex_len
    }
}
