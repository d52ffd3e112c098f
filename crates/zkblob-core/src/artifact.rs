//! Proof artifacts handed back by [`crate::CircuitSessionManager::generate_proof`].
//!
//! The artifact keeps the backend's combined blob intact (verification needs
//! it whole) and offers the codec's two extractions as helpers.
//!
//! ## Compatibility
//! - No `deny_unknown_fields`: newer producers may add keys.
//! - Unknown proof systems decode as [`ProofSystem::Unknown`].

use crate::abi::Circuit;
use crate::blob::BlobCodec;
use crate::error::Error;
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proof system variant requested from the backend.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProofSystem {
    /// UltraHonk.
    #[default]
    Honk,
    /// Catch-all for newer/unknown variants when deserializing.
    #[serde(other)]
    Unknown,
}

impl ProofSystem {
    /// Name used on the backend boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Honk => "honk",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined blob plus verification key, as produced by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Proof system that produced the blob.
    #[serde(default)]
    pub proof_system: ProofSystem,
    /// Hex `header ∥ commitments ∥ public inputs ∥ tail`.
    pub proof_with_public_inputs: String,
    /// Hex verification key.
    pub vkey: String,
}

impl ProofArtifact {
    /// Construct a new [`ProofArtifact`].
    #[must_use]
    pub fn new(
        proof_system: ProofSystem,
        proof_with_public_inputs: impl Into<String>,
        vkey: impl Into<String>,
    ) -> Self {
        Self {
            proof_system,
            proof_with_public_inputs: proof_with_public_inputs.into(),
            vkey: vkey.into(),
        }
    }

    /// Raw public inputs for `circuit`.
    pub fn public_inputs(&self, circuit: &Circuit) -> Result<String, Error> {
        crate::blob::extract_public_inputs(circuit, &self.proof_with_public_inputs)
    }

    /// Public inputs decoded per field element.
    pub fn public_input_fields(&self, circuit: &Circuit) -> Result<Vec<FieldElement>, Error> {
        let codec = BlobCodec::for_circuit(circuit)?;
        Ok(codec.decode_public_inputs(&self.proof_with_public_inputs)?)
    }

    /// Standalone proof for `circuit`.
    pub fn proof(&self, circuit: &Circuit) -> Result<String, Error> {
        crate::blob::extract_proof(circuit, &self.proof_with_public_inputs)
    }

    /// Length of the combined blob in hex characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.proof_with_public_inputs.len()
    }

    /// Whether the combined blob is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proof_with_public_inputs.is_empty()
    }
}
