//! Typed failures surfaced by the codec and the session manager.
//!
//! Nothing here is recovered internally: every variant reaches the caller.
//! Backend payloads are carried as opaque text and never interpreted.

use crate::session::SessionId;

/// The circuit ABI could not be turned into a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// A type description is missing required data or cannot be parsed.
    #[error("malformed ABI: {0}")]
    Malformed(String),
    /// A struct type declares no fields.
    #[error("malformed ABI: struct `{path}` has no fields")]
    EmptyStruct {
        /// Noir type path of the struct (may be empty).
        path: String,
    },
    /// The public field count does not fit in `usize`.
    #[error("malformed ABI: public field count overflows")]
    CountOverflow,
}

/// The combined blob does not match the layout derived from the ABI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// The blob ends before the public-input region does.
    #[error("malformed blob: expected at least {expected} hex chars, got {actual}")]
    TooShort {
        /// Minimum length implied by the ABI.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    /// A non-hex character sits inside the sliced region.
    #[error("malformed blob: non-hex byte 0x{byte:02x} at offset {offset}")]
    NotHex {
        /// Byte offset of the offending character.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },
}

/// Lifecycle and backend failures of [`crate::CircuitSessionManager`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The backend rejected the circuit bytecode or ABI.
    #[error("circuit setup failed: {0}")]
    SetupFailed(String),
    /// The backend could not produce a proof (e.g. unsatisfied constraints).
    #[error("proof generation failed: {0}")]
    ProvingFailed(String),
    /// The backend reported an error while verifying (not a rejected proof).
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
    /// The handle was torn down, individually or by a bulk teardown.
    #[error("session {0} has been destroyed")]
    SessionDestroyed(SessionId),
    /// The handle was never issued by this manager.
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    /// Any other backend failure (SRS preparation, resource release).
    #[error("backend error: {0}")]
    Backend(String),
    /// The circuit ABI could not be serialised for the backend.
    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Umbrella error for callers that mix codec and session calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// See [`AbiError`].
    #[error(transparent)]
    Abi(#[from] AbiError),
    /// See [`BlobError`].
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// See [`SessionError`].
    #[error(transparent)]
    Session(#[from] SessionError),
}
