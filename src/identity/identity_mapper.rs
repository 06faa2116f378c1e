use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::CandidateHandle;
use crate::CandidateId;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::LedgerContext;
use crate::LedgerErrorKind;
use crate::LedgerGateway;
use crate::Result;
use crate::LEDGER_WRITES;

/// How a candidate handle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOrigin {
    /// A new registration was written to the ledger.
    Registered,
    /// Registration reverted as a duplicate; the existing handle was read.
    AlreadyRegistered,
    /// Found by a read, no write attempted.
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRegistration {
    pub handle: CandidateHandle,
    pub origin: HandleOrigin,
}

impl CandidateRegistration {
    pub fn wrote_ledger(&self) -> bool {
        self.origin == HandleOrigin::Registered
    }
}

/// Result of writing a handle back to the local store.
///
/// The ledger write it follows is already committed, so a failure here is
/// a degraded success, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted,
    Deferred { warning: String },
}

impl PersistOutcome {
    pub fn warning(&self) -> Option<&str> {
        match self {
            PersistOutcome::Persisted => None,
            PersistOutcome::Deferred { warning } => Some(warning),
        }
    }
}

/// Maps local election/candidate ids to ledger handles.
///
/// Candidates are looked up on the ledger by student id only; local ids mean
/// nothing off-chain.
pub struct IdentityMapper<L, S> {
    ctx: LedgerContext<L>,
    store: Arc<S>,
}

impl<L, S> Clone for IdentityMapper<L, S> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            store: self.store.clone(),
        }
    }
}

impl<L, S> IdentityMapper<L, S>
where
    L: LedgerGateway,
    S: ElectionStore,
{
    pub fn new(
        ctx: LedgerContext<L>,
        store: Arc<S>,
    ) -> Self {
        Self { ctx, store }
    }

    /// `Ok(None)` when the student id has no ledger registration.
    pub async fn resolve_candidate_handle(
        &self,
        student_id: &str,
    ) -> Result<Option<CandidateHandle>> {
        match self.ctx.gateway().candidate_handle(student_id).await {
            Ok(handle) => Ok(Some(handle)),
            Err(e) if e.kind() == LedgerErrorKind::NotFound => {
                debug!("student {} has no ledger registration", student_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Registers the student id, treating a duplicate registration as
    /// success and returning the existing handle.
    pub async fn register_candidate(
        &self,
        student_id: &str,
    ) -> Result<CandidateRegistration> {
        let gateway = self.ctx.gateway();
        match gateway.register_candidate(self.ctx.account(), student_id).await {
            Ok(handle) => {
                LEDGER_WRITES.with_label_values(&["registerCandidate"]).inc();
                info!("registered student {} as {}", student_id, handle);
                Ok(CandidateRegistration {
                    handle,
                    origin: HandleOrigin::Registered,
                })
            }
            Err(e) if e.kind() == LedgerErrorKind::AlreadyRegistered => {
                debug!("student {} already registered, resolving existing handle", student_id);
                match self.resolve_candidate_handle(student_id).await? {
                    Some(handle) => Ok(CandidateRegistration {
                        handle,
                        origin: HandleOrigin::AlreadyRegistered,
                    }),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads first and registers only when the ledger does not know the
    /// student id.
    pub async fn ensure_candidate_handle(
        &self,
        student_id: &str,
    ) -> Result<CandidateRegistration> {
        if let Some(handle) = self.resolve_candidate_handle(student_id).await? {
            return Ok(CandidateRegistration {
                handle,
                origin: HandleOrigin::Resolved,
            });
        }
        self.register_candidate(student_id).await
    }

    pub async fn persist_election_handle(
        &self,
        local_id: ElectionId,
        handle: ElectionHandle,
    ) -> PersistOutcome {
        match self.store.set_election_handle(local_id, handle).await {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                let warning = format!("election {local_id} is deployed as {handle} but the mapping was not saved: {e}");
                warn!("{}", warning);
                PersistOutcome::Deferred { warning }
            }
        }
    }

    pub async fn persist_candidate_handle(
        &self,
        local_id: CandidateId,
        handle: CandidateHandle,
    ) -> PersistOutcome {
        match self.store.set_candidate_handle(local_id, handle).await {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                let warning =
                    format!("candidate {local_id} is registered as {handle} but the mapping was not saved: {e}");
                warn!("{}", warning);
                PersistOutcome::Deferred { warning }
            }
        }
    }
}
