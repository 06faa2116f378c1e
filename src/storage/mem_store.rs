use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use parking_lot::RwLock;
use tracing::trace;

use super::merge_election_update;
use crate::Candidate;
use crate::CandidateHandle;
use crate::CandidateId;
use crate::Election;
use crate::ElectionCandidate;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::Result;
use crate::StorageError;

/// In-memory election store
#[derive(Debug, Default)]
pub struct MemoryElectionStore {
    elections: RwLock<HashMap<ElectionId, Election>>,
    candidates: RwLock<HashMap<CandidateId, Candidate>>,
    roster: RwLock<BTreeMap<(ElectionId, CandidateId), ElectionCandidate>>,
    voters: RwLock<HashSet<(ElectionId, String)>>,
    fail_handle_writes: AtomicBool,
}

impl MemoryElectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent handle write fail, to exercise degraded
    /// success paths.
    pub fn set_fail_handle_writes(
        &self,
        fail: bool,
    ) {
        self.fail_handle_writes.store(fail, Ordering::SeqCst);
    }

    fn check_handle_write(&self) -> Result<()> {
        if self.fail_handle_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("handle writes disabled".into()).into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ElectionStore for MemoryElectionStore {
    async fn election(
        &self,
        id: ElectionId,
    ) -> Result<Option<Election>> {
        Ok(self.elections.read().get(&id).cloned())
    }

    async fn candidate(
        &self,
        id: CandidateId,
    ) -> Result<Option<Candidate>> {
        Ok(self.candidates.read().get(&id).cloned())
    }

    async fn roster(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<ElectionCandidate>> {
        let roster = self.roster.read();
        Ok(roster
            .range((election_id, CandidateId::MIN)..=(election_id, CandidateId::MAX))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn upsert_election(
        &self,
        election: Election,
    ) -> Result<()> {
        let mut elections = self.elections.write();
        let merged = merge_election_update(elections.get(&election.id), election)?;
        trace!("upsert election {}", merged.id);
        elections.insert(merged.id, merged);
        Ok(())
    }

    async fn election_by_handle(
        &self,
        handle: ElectionHandle,
    ) -> Result<Option<ElectionId>> {
        Ok(self
            .elections
            .read()
            .values()
            .find(|e| e.ledger_handle == Some(handle))
            .map(|e| e.id))
    }

    async fn upsert_candidate(
        &self,
        candidate: Candidate,
    ) -> Result<()> {
        self.candidates.write().insert(candidate.id, candidate);
        Ok(())
    }

    async fn add_roster_entry(
        &self,
        entry: ElectionCandidate,
    ) -> Result<()> {
        self.roster
            .write()
            .insert((entry.election_id, entry.candidate_id), entry);
        Ok(())
    }

    async fn set_election_handle(
        &self,
        id: ElectionId,
        handle: ElectionHandle,
    ) -> Result<()> {
        self.check_handle_write()?;
        let mut elections = self.elections.write();
        let election = elections.get_mut(&id).ok_or(StorageError::NotFound {
            entity: "election",
            id,
        })?;
        election.ledger_handle = Some(handle);
        Ok(())
    }

    async fn set_candidate_handle(
        &self,
        id: CandidateId,
        handle: CandidateHandle,
    ) -> Result<()> {
        self.check_handle_write()?;
        let mut candidates = self.candidates.write();
        let candidate = candidates.get_mut(&id).ok_or(StorageError::NotFound {
            entity: "candidate",
            id,
        })?;
        candidate.ledger_handle = Some(handle);
        Ok(())
    }

    async fn has_voted(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<bool> {
        Ok(self.voters.read().contains(&(election_id, voter_id.to_string())))
    }

    async fn record_vote(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<()> {
        self.voters.write().insert((election_id, voter_id.to_string()));
        Ok(())
    }
}
