//! Local system of record for election and candidate definitions.
//!
//! Handle writes are last-write-wins upserts keyed by local id, so racing
//! writers that observed the same ledger state converge on the same value.

mod mem_store;
mod sled_store;

pub use mem_store::*;
pub use sled_store::*;


///--------------------------------------
/// Trait Definition
#[cfg(test)]
use mockall::automock;

use crate::Candidate;
use crate::CandidateHandle;
use crate::CandidateId;
use crate::Election;
use crate::ElectionCandidate;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::Result;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ElectionStore: Send + Sync + 'static {
    async fn election(
        &self,
        id: ElectionId,
    ) -> Result<Option<Election>>;

    async fn candidate(
        &self,
        id: CandidateId,
    ) -> Result<Option<Candidate>>;

    /// Ballot composition of one election.
    async fn roster(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<ElectionCandidate>>;

    /// Creates or updates an election definition.
    ///
    /// Fails with [`crate::DefinitionError::LockedByLedgerHandle`] when the
    /// stored election is deployed and the update changes its category or
    /// schedule. An update without a handle keeps the stored one.
    async fn upsert_election(
        &self,
        election: Election,
    ) -> Result<()>;

    /// Local election currently mapped to `handle`, if any.
    async fn election_by_handle(
        &self,
        handle: ElectionHandle,
    ) -> Result<Option<ElectionId>>;

    async fn upsert_candidate(
        &self,
        candidate: Candidate,
    ) -> Result<()>;

    async fn add_roster_entry(
        &self,
        entry: ElectionCandidate,
    ) -> Result<()>;

    async fn set_election_handle(
        &self,
        id: ElectionId,
        handle: ElectionHandle,
    ) -> Result<()>;

    async fn set_candidate_handle(
        &self,
        id: CandidateId,
        handle: CandidateHandle,
    ) -> Result<()>;

    async fn has_voted(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<bool>;

    async fn record_vote(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<()>;
}

/// Applies the definition lock and carries the stored handle forward.
pub(crate) fn merge_election_update(
    existing: Option<&Election>,
    mut updated: Election,
) -> Result<Election> {
    if let Some(existing) = existing {
        existing.check_definition_change(&updated)?;
        if updated.ledger_handle.is_none() {
            updated.ledger_handle = existing.ledger_handle;
        }
    } else if updated.ends_at < updated.starts_at {
        return Err(crate::DefinitionError::InvalidSchedule { election_id: updated.id }.into());
    }
    Ok(updated)
}
