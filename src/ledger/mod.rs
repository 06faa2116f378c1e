//! Read/write contract of the external vote-recording ledger.
//!
//! The ledger is an opaque dependency. Everything in this crate talks to it
//! through [`LedgerGateway`], wrapped together with the signing account in a
//! [`LedgerContext`].

mod classify;
mod context;
mod memory_ledger;

pub use classify::*;
pub use context::*;
pub use memory_ledger::*;

#[cfg(test)]
mod classify_test;

///--------------------------------------
/// Trait Definition
#[cfg(test)]
use mockall::automock;

use crate::CandidateHandle;
use crate::ElectionHandle;
use crate::LedgerElection;
use crate::LedgerError;
use crate::PositionCategory;
use crate::TxPriority;
use crate::TxReceipt;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Every write is signed by `from`. Writes resolve once the transaction is
/// final; no client-side timeout applies.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LedgerGateway: Send + Sync + 'static {
    /// Fails with an "already registered" revert for a known student id.
    async fn register_candidate(
        &self,
        from: &str,
        student_id: &str,
    ) -> LedgerResult<CandidateHandle>;

    /// Fails with a not-found revert for an unknown student id.
    async fn candidate_handle(
        &self,
        student_id: &str,
    ) -> LedgerResult<CandidateHandle>;

    /// Fails with "already exists" when re-submitted for identical parameters.
    async fn create_election(
        &self,
        from: &str,
        category: PositionCategory,
        start_secs: u64,
        end_secs: u64,
    ) -> LedgerResult<ElectionHandle>;

    async fn find_election(
        &self,
        category: PositionCategory,
        start_secs: u64,
        end_secs: u64,
    ) -> LedgerResult<Option<ElectionHandle>>;

    /// Fails with "already added" on retry.
    async fn attach_candidate(
        &self,
        from: &str,
        election: ElectionHandle,
        candidate: CandidateHandle,
    ) -> LedgerResult<()>;

    async fn election_candidates(
        &self,
        election: ElectionHandle,
    ) -> LedgerResult<Vec<CandidateHandle>>;

    async fn election_details(
        &self,
        election: ElectionHandle,
    ) -> LedgerResult<LedgerElection>;

    /// The ledger decides the resulting status from its own clock. May be a
    /// no-op.
    async fn advance_election_status(
        &self,
        from: &str,
        election: ElectionHandle,
    ) -> LedgerResult<()>;

    async fn submit_vote(
        &self,
        from: &str,
        election: ElectionHandle,
        candidate: CandidateHandle,
        priority: TxPriority,
    ) -> LedgerResult<TxReceipt>;

    async fn candidate_votes(
        &self,
        election: ElectionHandle,
        candidate: CandidateHandle,
    ) -> LedgerResult<u64>;
}
