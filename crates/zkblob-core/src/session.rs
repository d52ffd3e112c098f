//! Circuit session lifecycle over an injected [`ProvingBackend`].
//!
//! Each session moves `Uninitialized → Ready → Destroyed` and never back.
//! Calls on one session are serialised: the per-session operation lock is
//! held across the backend await, so at most one setup-dependent call is in
//! flight per session. The session table lock is only held for lookups.

use crate::abi::Circuit;
use crate::artifact::{ProofArtifact, ProofSystem};
use crate::backend::{InputMap, ProvingBackend};
use crate::blob::BlobCodec;
use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Opaque handle returned by [`CircuitSessionManager::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Never set up by this manager.
    Uninitialized,
    /// Usable.
    Ready,
    /// Torn down; every further call fails.
    Destroyed,
}

/// Payload of a `Ready` session; dropped on teardown.
struct Live {
    circuit: Arc<Circuit>,
    codec: BlobCodec,
    backend_id: String,
}

/// Table entry. Destroyed sessions keep an empty slot so their ids stay
/// distinguishable from ids never issued.
struct Slot {
    live: Mutex<Option<Live>>,
    op: tokio::sync::Mutex<()>,
}

impl Slot {
    fn live(&self) -> MutexGuard<'_, Option<Live>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self) -> bool {
        self.live().is_some()
    }

    fn backend_id(&self, id: SessionId) -> Result<String, SessionError> {
        self.live()
            .as_ref()
            .map(|l| l.backend_id.clone())
            .ok_or(SessionError::SessionDestroyed(id))
    }

    fn destroy(&self) {
        *self.live() = None;
    }
}

/// Owns circuit sessions and routes their calls to the backend.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct CircuitSessionManager<B> {
    backend: B,
    sessions: Mutex<HashMap<SessionId, Arc<Slot>>>,
    next_id: AtomicU64,
    // Read-held by `setup` from the backend call to the table insert,
    // write-held by `teardown_all`.
    registry: tokio::sync::RwLock<()>,
}

impl<B: ProvingBackend> CircuitSessionManager<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            registry: tokio::sync::RwLock::new(()),
        }
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Forward SRS preparation to the backend.
    pub async fn prepare_srs(&self) -> Result<(), SessionError> {
        self.backend
            .prepare_srs()
            .await
            .map_err(|e| SessionError::Backend(e.0))
    }

    /// Load `circuit` into the backend and open a session for it.
    #[tracing::instrument(skip_all, fields(recursive = recursive), level = "debug")]
    pub async fn setup(
        &self,
        circuit: impl Into<Arc<Circuit>>,
        recursive: bool,
    ) -> Result<SessionId, SessionError> {
        let circuit = circuit.into();
        circuit.validate()?;
        let codec = BlobCodec::for_circuit(&circuit)?;
        let abi_json = circuit.abi_json()?;

        let _registry = self.registry.read().await;
        let backend_id = self
            .backend
            .setup(&circuit.bytecode, &abi_json, recursive)
            .await
            .map_err(|e| {
                warn!(error = %e, "backend rejected circuit");
                SessionError::SetupFailed(e.0)
            })?;

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!(
            session = %id,
            backend_id = %backend_id,
            public_fields = codec.layout().public_field_count,
            recursive,
            "circuit session ready"
        );
        let slot = Arc::new(Slot {
            live: Mutex::new(Some(Live {
                circuit,
                codec,
                backend_id,
            })),
            op: tokio::sync::Mutex::new(()),
        });
        self.table().insert(id, slot);
        Ok(id)
    }

    /// Prove `inputs` with the session's circuit.
    #[tracing::instrument(skip_all, fields(session = %id), level = "debug")]
    pub async fn generate_proof(
        &self,
        id: SessionId,
        inputs: &InputMap,
        proof_system: ProofSystem,
        recursive: bool,
    ) -> Result<ProofArtifact, SessionError> {
        let slot = self.slot(id)?;
        let _op = slot.op.lock().await;
        let backend_id = slot.backend_id(id)?;

        debug!(%proof_system, recursive, "generating proof");
        let out = self
            .backend
            .prove(inputs, &backend_id, proof_system, recursive)
            .await
            .map_err(|e| {
                warn!(error = %e, "proving failed");
                SessionError::ProvingFailed(e.0)
            })?;
        info!(len = out.proof_with_public_inputs.len(), "proof generated");
        Ok(ProofArtifact {
            proof_system,
            proof_with_public_inputs: out.proof_with_public_inputs,
            vkey: out.vkey,
        })
    }

    /// Verify a full combined blob. The blob is passed through untouched.
    #[tracing::instrument(skip_all, fields(session = %id), level = "debug")]
    pub async fn verify_proof(
        &self,
        id: SessionId,
        proof_with_public_inputs: &str,
        vkey: &str,
        proof_system: ProofSystem,
    ) -> Result<bool, SessionError> {
        let slot = self.slot(id)?;
        let _op = slot.op.lock().await;
        let backend_id = slot.backend_id(id)?;

        let ok = self
            .backend
            .verify(proof_with_public_inputs, vkey, &backend_id, proof_system)
            .await
            .map_err(|e| {
                warn!(error = %e, "verification errored");
                SessionError::VerificationFailed(e.0)
            })?;
        info!(verified = ok, "proof checked");
        Ok(ok)
    }

    /// Release the session's backend resources.
    ///
    /// A second teardown fails with [`SessionError::SessionDestroyed`]. If the
    /// backend fails to release, the session stays usable and the error is
    /// returned.
    #[tracing::instrument(skip_all, fields(session = %id), level = "debug")]
    pub async fn teardown(&self, id: SessionId) -> Result<(), SessionError> {
        let slot = self.slot(id)?;
        let _op = slot.op.lock().await;
        let backend_id = slot.backend_id(id)?;

        self.backend
            .clear(&backend_id)
            .await
            .map_err(|e| SessionError::Backend(e.0))?;
        slot.destroy();
        info!("circuit session destroyed");
        Ok(())
    }

    /// Destroy every session and release everything the backend holds.
    ///
    /// Waits for in-flight calls and setups to finish before invalidating
    /// each handle.
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn teardown_all(&self) -> Result<(), SessionError> {
        let _registry = self.registry.write().await;
        let mut slots: Vec<(SessionId, Arc<Slot>)> = self
            .table()
            .iter()
            .map(|(id, s)| (*id, Arc::clone(s)))
            .collect();
        // Fixed lock order so concurrent bulk teardowns cannot deadlock.
        slots.sort_unstable_by_key(|(id, _)| *id);
        let mut guards = Vec::with_capacity(slots.len());
        for (_, slot) in &slots {
            guards.push(slot.op.lock().await);
        }

        self.backend
            .clear_all()
            .await
            .map_err(|e| SessionError::Backend(e.0))?;
        for (_, slot) in &slots {
            slot.destroy();
        }
        drop(guards);
        info!(count = slots.len(), "all circuit sessions destroyed");
        Ok(())
    }

    /// Lifecycle state of `id`.
    pub fn state(&self, id: SessionId) -> SessionState {
        match self.table().get(&id) {
            None => SessionState::Uninitialized,
            Some(s) if s.is_live() => SessionState::Ready,
            Some(_) => SessionState::Destroyed,
        }
    }

    /// The circuit a live session was set up from.
    pub fn circuit(&self, id: SessionId) -> Result<Arc<Circuit>, SessionError> {
        self.slot(id)?
            .live()
            .as_ref()
            .map(|l| Arc::clone(&l.circuit))
            .ok_or(SessionError::SessionDestroyed(id))
    }

    /// Codec for the session's circuit.
    pub fn codec(&self, id: SessionId) -> Result<BlobCodec, SessionError> {
        self.slot(id)?
            .live()
            .as_ref()
            .map(|l| l.codec)
            .ok_or(SessionError::SessionDestroyed(id))
    }

    /// Number of sessions currently `Ready`.
    pub fn live_sessions(&self) -> usize {
        self.table().values().filter(|s| s.is_live()).count()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Slot>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, id: SessionId) -> Result<Arc<Slot>, SessionError> {
        self.table()
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))
    }
}

impl<B> fmt::Debug for CircuitSessionManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitSessionManager")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
