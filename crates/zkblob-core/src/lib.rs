//! zkblob-core — ABI-driven layout of combined proof blobs, and a session
//! manager around an external proving backend.
//!
//! The pieces, leaves first:
//! - [`abi`]: the circuit's typed parameters (`Field`, strings, arrays,
//!   structs, ...) tagged public or private,
//! - [`count`]: how many field elements the public parameters occupy,
//! - [`layout`]: the fixed wire constants and the offsets they imply,
//! - [`blob`]: slicing the backend's `proof ∥ public inputs` hex blob,
//! - [`session`]: `setup → prove/verify → teardown` over a [`ProvingBackend`].
//!
//! Only the session manager touches the backend; everything else is pure.
//!
//! ```
//! use zkblob_core::{BlobCodec, Circuit, Parameter, ParameterType, Visibility};
//!
//! let circuit = Circuit::new("", vec![
//!     Parameter::new("root", ParameterType::Field, Visibility::Public),
//!     Parameter::new("secret", ParameterType::Field, Visibility::Private),
//! ])?;
//! let codec = BlobCodec::for_circuit(&circuit)?;
//! let blob = format!("{}{}{}{}", "00000001", "f".repeat(192), "a".repeat(64), "b".repeat(64));
//! assert_eq!(codec.extract_public_inputs(&blob)?, "a".repeat(64));
//! assert_eq!(codec.extract_proof(&blob)?, format!("{}{}", "f".repeat(192), "b".repeat(64)));
//! # Ok::<(), zkblob_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Circuit interface description.
pub mod abi;
/// Proof artifacts and proof-system identifiers.
pub mod artifact;
/// Backend trait the session manager delegates to.
pub mod backend;
/// Blob slicing.
pub mod blob;
/// Caller-side defaults.
pub mod config;
/// Public field counting.
pub mod count;
/// Error taxonomy.
pub mod error;
/// 32-byte wire field elements.
pub mod field;
/// JSON/CBOR/hex file helpers.
pub mod io;
/// Wire constants and region offsets.
pub mod layout;
/// Circuit session lifecycle.
pub mod session;

pub use abi::{Abi, Circuit, Parameter, ParameterType, Sign, StructField, Visibility};
pub use artifact::{ProofArtifact, ProofSystem};
pub use backend::{BackendError, BackendProof, InputMap, ProvingBackend};
pub use blob::{extract_proof, extract_public_inputs, BlobCodec, SplitBlob};
pub use config::SessionOptions;
pub use count::public_field_count;
pub use error::{AbiError, BlobError, Error, SessionError};
pub use field::FieldElement;
pub use layout::BlobLayout;
pub use session::{CircuitSessionManager, SessionId, SessionState};

/// Commonly-used items for quick imports.
pub mod prelude {
    pub use crate::{
        BlobCodec, BlobLayout, Circuit, CircuitSessionManager, ProofArtifact, ProofSystem,
        ProvingBackend, SessionId,
    };
}
