use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;

use crate::CandidateHandle;
use crate::Clock;
use crate::ElectionHandle;
use crate::LedgerElection;
use crate::LedgerError;
use crate::LedgerGateway;
use crate::LedgerResult;
use crate::LedgerStatus;
use crate::PositionCategory;
use crate::TxPriority;
use crate::TxReceipt;

/// Write operations whose next outcome can be scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOp {
    RegisterCandidate,
    CreateElection,
    AttachCandidate,
    AdvanceStatus,
    SubmitVote,
}

#[derive(Debug)]
struct ElectionRecord {
    category: PositionCategory,
    start_secs: u64,
    end_secs: u64,
    status: LedgerStatus,
    candidates: Vec<CandidateHandle>,
    votes: HashMap<CandidateHandle, u64>,
    voters: HashSet<String>,
    total_votes_cast: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    candidates: HashMap<String, CandidateHandle>,
    elections: BTreeMap<ElectionHandle, ElectionRecord>,
    next_candidate: u64,
    next_election: u64,
    block: u64,
    writes: usize,
    scripted_failures: HashMap<LedgerOp, VecDeque<String>>,
    vote_priorities: Vec<TxPriority>,
}

/// In-process stand-in for the ledger contract.
///
/// Reverts with the same human-readable messages as the deployed contract,
/// never changes status on its own, and moves one lifecycle step per
/// `advance_election_status` call based on its clock.
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("InMemoryLedger")
            .field("candidates", &state.candidates.len())
            .field("elections", &state.elections.len())
            .field("writes", &state.writes)
            .finish()
    }
}

impl InMemoryLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            clock,
        }
    }

    /// Makes the next `op` fail with `message` without touching state.
    pub fn fail_next(
        &self,
        op: LedgerOp,
        message: impl Into<String>,
    ) {
        self.state
            .lock()
            .scripted_failures
            .entry(op)
            .or_default()
            .push_back(message.into());
    }

    /// Number of write transactions that succeeded.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Priority of every vote submission attempt, in order.
    pub fn vote_priorities(&self) -> Vec<TxPriority> {
        self.state.lock().vote_priorities.clone()
    }

    /// Administrative cancellation.
    pub fn cancel_election(
        &self,
        election: ElectionHandle,
    ) -> LedgerResult<()> {
        let mut state = self.state.lock();
        let record = state
            .elections
            .get_mut(&election)
            .ok_or_else(|| revert("cancelElection", "Election does not exist"))?;
        if record.status.is_terminal() {
            return Err(revert("cancelElection", "Election already finished"));
        }
        record.status = LedgerStatus::Cancelled;
        state.writes += 1;
        Ok(())
    }

    fn take_scripted_failure(
        state: &mut LedgerState,
        op: LedgerOp,
    ) -> Option<String> {
        state.scripted_failures.get_mut(&op).and_then(|queue| queue.pop_front())
    }

    fn commit(state: &mut LedgerState) -> u64 {
        state.writes += 1;
        state.block += 1;
        state.block
    }
}

fn revert(
    operation: &'static str,
    reason: &str,
) -> LedgerError {
    LedgerError::new(operation, format!("execution reverted: {reason}"))
}

#[async_trait::async_trait]
impl LedgerGateway for InMemoryLedger {
    async fn register_candidate(
        &self,
        from: &str,
        student_id: &str,
    ) -> LedgerResult<CandidateHandle> {
        let mut state = self.state.lock();
        if let Some(message) = Self::take_scripted_failure(&mut state, LedgerOp::RegisterCandidate) {
            return Err(LedgerError::new("registerCandidate", message));
        }
        if state.candidates.contains_key(student_id) {
            return Err(revert("registerCandidate", "Candidate already registered"));
        }

        state.next_candidate += 1;
        let handle = CandidateHandle(state.next_candidate);
        state.candidates.insert(student_id.to_string(), handle);
        Self::commit(&mut state);
        debug!("{} registered {} as {}", from, student_id, handle);
        Ok(handle)
    }

    async fn candidate_handle(
        &self,
        student_id: &str,
    ) -> LedgerResult<CandidateHandle> {
        self.state
            .lock()
            .candidates
            .get(student_id)
            .copied()
            .ok_or_else(|| revert("getCandidateId", "Candidate not registered"))
    }

    async fn create_election(
        &self,
        from: &str,
        category: PositionCategory,
        start_secs: u64,
        end_secs: u64,
    ) -> LedgerResult<ElectionHandle> {
        let mut state = self.state.lock();
        if let Some(message) = Self::take_scripted_failure(&mut state, LedgerOp::CreateElection) {
            return Err(LedgerError::new("createElection", message));
        }
        if end_secs <= start_secs {
            return Err(revert("createElection", "Invalid election period"));
        }
        let exists = state
            .elections
            .values()
            .any(|e| e.category == category && e.start_secs == start_secs && e.end_secs == end_secs);
        if exists {
            return Err(revert("createElection", "Election already exists"));
        }

        state.next_election += 1;
        let handle = ElectionHandle(state.next_election);
        state.elections.insert(
            handle,
            ElectionRecord {
                category,
                start_secs,
                end_secs,
                status: LedgerStatus::Pending,
                candidates: Vec::new(),
                votes: HashMap::new(),
                voters: HashSet::new(),
                total_votes_cast: 0,
            },
        );
        Self::commit(&mut state);
        debug!("{} created {} ({}, {}..{})", from, handle, category, start_secs, end_secs);
        Ok(handle)
    }

    async fn find_election(
        &self,
        category: PositionCategory,
        start_secs: u64,
        end_secs: u64,
    ) -> LedgerResult<Option<ElectionHandle>> {
        let state = self.state.lock();
        Ok(state
            .elections
            .iter()
            .find(|(_, e)| e.category == category && e.start_secs == start_secs && e.end_secs == end_secs)
            .map(|(handle, _)| *handle))
    }

    async fn attach_candidate(
        &self,
        from: &str,
        election: ElectionHandle,
        candidate: CandidateHandle,
    ) -> LedgerResult<()> {
        let mut state = self.state.lock();
        if let Some(message) = Self::take_scripted_failure(&mut state, LedgerOp::AttachCandidate) {
            return Err(LedgerError::new("addCandidateToElection", message));
        }
        if !state.candidates.values().any(|h| *h == candidate) {
            return Err(revert("addCandidateToElection", "Candidate not registered"));
        }
        let record = state
            .elections
            .get_mut(&election)
            .ok_or_else(|| revert("addCandidateToElection", "Election does not exist"))?;
        if record.candidates.contains(&candidate) {
            return Err(revert("addCandidateToElection", "Candidate already added to election"));
        }

        record.candidates.push(candidate);
        Self::commit(&mut state);
        trace!("{} attached {} to {}", from, candidate, election);
        Ok(())
    }

    async fn election_candidates(
        &self,
        election: ElectionHandle,
    ) -> LedgerResult<Vec<CandidateHandle>> {
        self.state
            .lock()
            .elections
            .get(&election)
            .map(|e| e.candidates.clone())
            .ok_or_else(|| revert("getElectionCandidates", "Election does not exist"))
    }

    async fn election_details(
        &self,
        election: ElectionHandle,
    ) -> LedgerResult<LedgerElection> {
        self.state
            .lock()
            .elections
            .get(&election)
            .map(|e| LedgerElection {
                handle: election,
                status: e.status,
                start_secs: e.start_secs,
                end_secs: e.end_secs,
                total_votes_cast: e.total_votes_cast,
                results_finalized: e.status == LedgerStatus::Completed,
            })
            .ok_or_else(|| revert("getElectionDetails", "Election does not exist"))
    }

    async fn advance_election_status(
        &self,
        from: &str,
        election: ElectionHandle,
    ) -> LedgerResult<()> {
        let now = self.clock.now_secs();
        let mut state = self.state.lock();
        if let Some(message) = Self::take_scripted_failure(&mut state, LedgerOp::AdvanceStatus) {
            return Err(LedgerError::new("updateElectionStatus", message));
        }
        let record = state
            .elections
            .get_mut(&election)
            .ok_or_else(|| revert("updateElectionStatus", "Election does not exist"))?;

        let before = record.status;
        record.status = match record.status {
            LedgerStatus::Pending if now >= record.start_secs => LedgerStatus::Active,
            LedgerStatus::Active if now > record.end_secs => LedgerStatus::Completed,
            unchanged => unchanged,
        };
        let after = record.status;
        Self::commit(&mut state);
        debug!("{} advanced {}: {} -> {}", from, election, before, after);
        Ok(())
    }

    async fn submit_vote(
        &self,
        from: &str,
        election: ElectionHandle,
        candidate: CandidateHandle,
        priority: TxPriority,
    ) -> LedgerResult<TxReceipt> {
        let now = self.clock.now_secs();
        let mut state = self.state.lock();
        state.vote_priorities.push(priority);
        if let Some(message) = Self::take_scripted_failure(&mut state, LedgerOp::SubmitVote) {
            return Err(LedgerError::new("vote", message));
        }
        let record = state
            .elections
            .get_mut(&election)
            .ok_or_else(|| revert("vote", "Election does not exist"))?;
        if record.status != LedgerStatus::Active || now < record.start_secs || now > record.end_secs {
            return Err(revert("vote", "Election is not active"));
        }
        if !record.candidates.contains(&candidate) {
            return Err(revert("vote", "Candidate not in this election"));
        }
        if !record.voters.insert(from.to_string()) {
            return Err(revert("vote", "You have already voted in this election"));
        }

        *record.votes.entry(candidate).or_insert(0) += 1;
        record.total_votes_cast += 1;
        let block = Self::commit(&mut state);
        Ok(TxReceipt {
            tx_id: format!("0x{}", nanoid::nanoid!(32, &nanoid::alphabet::SAFE)),
            block,
        })
    }

    async fn candidate_votes(
        &self,
        election: ElectionHandle,
        candidate: CandidateHandle,
    ) -> LedgerResult<u64> {
        self.state
            .lock()
            .elections
            .get(&election)
            .map(|e| e.votes.get(&candidate).copied().unwrap_or(0))
            .ok_or_else(|| revert("getCandidateVotes", "Election does not exist"))
    }
}
