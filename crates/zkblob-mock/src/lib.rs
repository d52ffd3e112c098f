//! zkblob-mock — a deterministic, in-memory [`ProvingBackend`].
//!
//! It speaks the same blob layout as the native backend so the session
//! manager, the codec and the CLI can run end to end without native code.
//! It proves nothing: commitments and the proof tail are BLAKE3 digests.
//!
//! Blob construction, in hex:
//! - header: total field count `3 + N + TAIL_FIELDS`, 4 bytes big-endian,
//! - commitments: three digests over the circuit digest and the full witness,
//! - public inputs: the public witness in ABI order,
//! - tail: [`TAIL_FIELDS`] fields of BLAKE3 XOF over circuit digest,
//!   commitments and public inputs.
//!
//! `verify` recomputes the tail, so any edit to the commitments or the public
//! inputs makes it return `false`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

/// JSON inputs → field elements.
pub mod encode;

use blake3::Hasher;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use zkblob_core::field::FIELD_BYTES;
use zkblob_core::layout::{COMMITMENT_COUNT, HEADER_END, HEADER_HEX_WIDTH};
use zkblob_core::{
    Abi, BackendError, BackendProof, BlobCodec, BlobLayout, Circuit, InputMap, ProofSystem,
    ProvingBackend,
};

pub use encode::{encode_inputs, EncodeError, Witness};

/// Proof-tail width in field elements.
pub const TAIL_FIELDS: usize = 4;

const COMMIT_DOMAIN: &[u8] = b"zkblob-mock/commit/v1";
const TAIL_DOMAIN: &[u8] = b"zkblob-mock/tail/v1";
const VKEY_DOMAIN: &[u8] = b"zkblob-mock/vkey/v1";

struct Loaded {
    abi: Abi,
    layout: BlobLayout,
    digest: [u8; 32],
    recursive: bool,
}

/// In-memory backend. Circuit ids are `mock-<n>`.
#[derive(Default)]
pub struct MockBackend {
    circuits: Mutex<HashMap<String, Loaded>>,
    next_id: AtomicU64,
    require_srs: bool,
    srs_ready: AtomicBool,
}

impl MockBackend {
    /// A backend that needs no SRS preparation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses `setup` until `prepare_srs` has run, like the
    /// native Android build.
    #[must_use]
    pub fn requiring_srs() -> Self {
        Self {
            require_srs: true,
            ..Self::default()
        }
    }

    /// Number of circuits currently loaded.
    pub fn loaded(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Loaded>> {
        self.circuits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_circuit<T>(
        &self,
        circuit_id: &str,
        f: impl FnOnce(&Loaded) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        let table = self.table();
        let loaded = table
            .get(circuit_id)
            .ok_or_else(|| BackendError(format!("circuit {circuit_id} is not loaded")))?;
        f(loaded)
    }
}

fn check_system(proof_system: ProofSystem) -> Result<(), BackendError> {
    match proof_system {
        ProofSystem::Honk => Ok(()),
        other => Err(BackendError(format!("unsupported proof system: {other}"))),
    }
}

fn vkey_digest(bytecode: &str, abi_json: &str, recursive: bool) -> [u8; 32] {
    let mut h = Hasher::new();
    h.update(VKEY_DOMAIN);
    h.update(&(bytecode.len() as u64).to_le_bytes());
    h.update(bytecode.as_bytes());
    h.update(abi_json.as_bytes());
    h.update(&[u8::from(recursive)]);
    *h.finalize().as_bytes()
}

fn commitments(digest: &[u8; 32], witness: &Witness) -> Vec<[u8; 32]> {
    (0..COMMITMENT_COUNT)
        .map(|i| {
            let mut h = Hasher::new();
            h.update(COMMIT_DOMAIN);
            h.update(digest);
            h.update(&(i as u32).to_le_bytes());
            for f in witness.public.iter().chain(&witness.private) {
                h.update(f.as_bytes());
            }
            *h.finalize().as_bytes()
        })
        .collect()
}

fn tail(digest: &[u8; 32], commitments: &[u8], public: &[u8]) -> Vec<u8> {
    let mut h = Hasher::new();
    h.update(TAIL_DOMAIN);
    h.update(digest);
    h.update(commitments);
    h.update(public);
    let mut out = vec![0u8; TAIL_FIELDS * FIELD_BYTES];
    h.finalize_xof().fill(&mut out);
    out
}

fn header(layout: &BlobLayout) -> Result<String, BackendError> {
    let total = COMMITMENT_COUNT + layout.public_field_count + TAIL_FIELDS;
    let total = u32::try_from(total).map_err(|_| BackendError::msg("proof too large"))?;
    Ok(hex::encode(total.to_be_bytes()))
}

impl ProvingBackend for MockBackend {
    async fn prepare_srs(&self) -> Result<(), BackendError> {
        self.srs_ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn setup(
        &self,
        bytecode: &str,
        abi_json: &str,
        recursive: bool,
    ) -> Result<String, BackendError> {
        if self.require_srs && !self.srs_ready.load(Ordering::Acquire) {
            return Err(BackendError::msg("SRS not prepared"));
        }
        if bytecode.is_empty() {
            return Err(BackendError::msg("empty bytecode"));
        }
        let abi: Abi = serde_json::from_str(abi_json).map_err(BackendError::msg)?;
        let circuit = Circuit::new(bytecode, abi.parameters).map_err(BackendError::msg)?;
        let layout = BlobLayout::for_circuit(&circuit).map_err(BackendError::msg)?;

        let id = format!("mock-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(circuit_id = %id, public_fields = layout.public_field_count, "mock circuit loaded");
        self.table().insert(
            id.clone(),
            Loaded {
                abi: circuit.abi,
                layout,
                digest: vkey_digest(bytecode, abi_json, recursive),
                recursive,
            },
        );
        Ok(id)
    }

    async fn prove(
        &self,
        inputs: &InputMap,
        circuit_id: &str,
        proof_system: ProofSystem,
        recursive: bool,
    ) -> Result<BackendProof, BackendError> {
        check_system(proof_system)?;
        self.with_circuit(circuit_id, |c| {
            if recursive && !c.recursive {
                return Err(BackendError::msg(
                    "circuit was not set up for recursive proving",
                ));
            }
            let witness = encode_inputs(&c.abi, inputs).map_err(BackendError::msg)?;

            let commits = commitments(&c.digest, &witness).concat();
            let public: Vec<u8> = witness
                .public
                .iter()
                .flat_map(|f| f.as_bytes().iter().copied())
                .collect();
            let tail = tail(&c.digest, &commits, &public);

            let mut blob = header(&c.layout)?;
            blob.push_str(&hex::encode(&commits));
            blob.push_str(&hex::encode(&public));
            blob.push_str(&hex::encode(&tail));
            Ok(BackendProof {
                proof_with_public_inputs: blob,
                vkey: hex::encode(c.digest),
            })
        })
    }

    async fn verify(
        &self,
        proof_with_public_inputs: &str,
        vkey: &str,
        circuit_id: &str,
        proof_system: ProofSystem,
    ) -> Result<bool, BackendError> {
        check_system(proof_system)?;
        self.with_circuit(circuit_id, |c| {
            if vkey != hex::encode(c.digest) {
                return Ok(false);
            }
            let codec = BlobCodec::new(c.layout);
            let split = codec
                .split(proof_with_public_inputs)
                .map_err(BackendError::msg)?;
            if proof_with_public_inputs[..HEADER_HEX_WIDTH] != header(&c.layout)? {
                return Ok(false);
            }
            let decode = |s: &str| hex::decode(s).map_err(BackendError::msg);
            let commits = decode(&proof_with_public_inputs[HEADER_HEX_WIDTH..HEADER_END])?;
            let public = decode(split.public_inputs)?;
            let claimed = decode(&proof_with_public_inputs[c.layout.public_inputs_end..])?;
            Ok(claimed == tail(&c.digest, &commits, &public))
        })
    }

    async fn clear(&self, circuit_id: &str) -> Result<(), BackendError> {
        self.table()
            .remove(circuit_id)
            .map(|_| ())
            .ok_or_else(|| BackendError(format!("circuit {circuit_id} is not loaded")))
    }

    async fn clear_all(&self) -> Result<(), BackendError> {
        self.table().clear();
        Ok(())
    }
}
