//! Proving backend abstraction.
//!
//! The backend is the native engine that compiles circuits, proves and
//! verifies. It is injected into [`crate::CircuitSessionManager`] so the
//! codec and layout logic never depend on it, and so backends for other proof
//! systems can be swapped in.
//!
//! ## Contracts implementors should uphold
//! - `setup` returns an id that stays valid until `clear`/`clear_all`.
//! - `prove` returns the combined blob laid out as described in
//!   [`crate::layout`], with the public inputs in ABI order.
//! - `verify` returns `Ok(false)` for a well-formed proof that does not
//!   verify and `Err` only when verification could not be carried out.
//! - No method panics on malformed input.
//!
//! Every method may run for seconds; futures must be `Send` so callers can
//! drive them from a multi-threaded runtime.

use crate::artifact::ProofSystem;
use std::future::Future;

/// Circuit inputs keyed by parameter name, in the backend's JSON shape.
pub type InputMap = serde_json::Map<String, serde_json::Value>;

/// Opaque failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    /// Wrap any displayable message.
    pub fn msg(m: impl std::fmt::Display) -> Self {
        Self(m.to_string())
    }
}

/// Successful output of [`ProvingBackend::prove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProof {
    /// Combined hex blob.
    pub proof_with_public_inputs: String,
    /// Hex verification key.
    pub vkey: String,
}

/// Native proving engine, seen only at its interface.
pub trait ProvingBackend: Send + Sync {
    /// Prepare the structured reference string. Only some platforms need it.
    fn prepare_srs(&self) -> impl Future<Output = Result<(), BackendError>> + Send {
        std::future::ready(Ok(()))
    }

    /// Compile/load a circuit and return the backend's handle for it.
    fn setup(
        &self,
        bytecode: &str,
        abi_json: &str,
        recursive: bool,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Prove `inputs` against a loaded circuit.
    fn prove(
        &self,
        inputs: &InputMap,
        circuit_id: &str,
        proof_system: ProofSystem,
        recursive: bool,
    ) -> impl Future<Output = Result<BackendProof, BackendError>> + Send;

    /// Verify a combined blob.
    fn verify(
        &self,
        proof_with_public_inputs: &str,
        vkey: &str,
        circuit_id: &str,
        proof_system: ProofSystem,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Release one loaded circuit.
    fn clear(&self, circuit_id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Release every loaded circuit.
    fn clear_all(&self) -> impl Future<Output = Result<(), BackendError>> + Send;
}
