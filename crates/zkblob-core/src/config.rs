//! Caller-side defaults for proving and verifying.

use crate::artifact::ProofSystem;
use serde::{Deserialize, Serialize};

/// Defaults applied when a caller does not pick a proof system or recursion
/// mode explicitly. Missing keys fall back to [`Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Proof system passed to the backend.
    pub proof_system: ProofSystem,
    /// Build proofs that can be verified inside another circuit.
    pub recursive: bool,
}
