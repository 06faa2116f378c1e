use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::resolve_ballot_target;
use crate::BallotSyncConfig;
use crate::CandidateHandle;
use crate::CandidateId;
use crate::Clock;
use crate::Election;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::IdentityMapper;
use crate::InFlightKey;
use crate::InFlightRegistry;
use crate::InactiveReason;
use crate::LedgerContext;
use crate::LedgerErrorKind;
use crate::LedgerGateway;
use crate::LedgerStatus;
use crate::ResubmitPolicy;
use crate::StatusSynchronizer;
use crate::StorageError;
use crate::SyncAction;
use crate::TxPriority;
use crate::TxReceipt;
use crate::VoteError;
use crate::LEDGER_WRITES;
use crate::VOTE_OUTCOMES;

pub type VoteResult<T> = std::result::Result<T, VoteError>;

/// One ballot choice by one voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub election_id: ElectionId,
    /// Local id of the chosen candidate. A running mate is accepted and
    /// counts for the ticket.
    pub candidate_id: CandidateId,
    pub voter_id: String,
    pub faculty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The ledger confirmed a new vote.
    Recorded { receipt: TxReceipt, resubmitted: bool },
    /// The ledger already holds a vote from this account.
    AlreadyRecordedOnChain,
    /// The voter declined to sign.
    Cancelled,
}

impl VoteOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VoteOutcome::Recorded { .. } => "recorded",
            VoteOutcome::AlreadyRecordedOnChain => "already_voted_on_chain",
            VoteOutcome::Cancelled => "cancelled",
        }
    }

    /// Whether the voter now counts as having voted.
    pub fn is_counted(&self) -> bool {
        !matches!(self, VoteOutcome::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSubmission {
    pub outcome: VoteOutcome,
    /// Degraded successes, e.g. the local "has voted" flag was not saved.
    pub warnings: Vec<String>,
}

/// Mediates one voter's ballot from local checks to ledger confirmation.
///
/// The context must be signed by the voter's own account; the ledger keeps
/// one vote per account and election.
pub struct VoteSubmissionCoordinator<L, S> {
    ctx: LedgerContext<L>,
    store: Arc<S>,
    mapper: IdentityMapper<L, S>,
    synchronizer: StatusSynchronizer<L, S>,
    clock: Arc<dyn Clock>,
    resubmit: ResubmitPolicy,
    in_flight: InFlightRegistry,
}

impl<L, S> VoteSubmissionCoordinator<L, S>
where
    L: LedgerGateway,
    S: ElectionStore,
{
    pub fn new(
        ctx: LedgerContext<L>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        config: &BallotSyncConfig,
        in_flight: InFlightRegistry,
    ) -> Self {
        let mapper = IdentityMapper::new(ctx.clone(), store.clone());
        let synchronizer = StatusSynchronizer::new(ctx.clone(), store.clone(), clock.clone(), config.sync.clone());
        Self {
            ctx,
            store,
            mapper,
            synchronizer,
            clock,
            resubmit: config.retry.vote,
            in_flight,
        }
    }

    /// Submits one vote and reports a single definitive outcome.
    ///
    /// Preconditions are checked in order and each failure is terminal:
    /// deployment, local "has voted", faculty eligibility, ledger status.
    pub async fn vote(
        &self,
        request: &VoteRequest,
    ) -> VoteResult<VoteSubmission> {
        let result = self.submit(request).await;
        let label = match &result {
            Ok(submission) => submission.outcome.label(),
            Err(e) => e.label(),
        };
        VOTE_OUTCOMES.with_label_values(&[label]).inc();

        match &result {
            Ok(submission) => info!(
                "vote of {} in election {}: {}",
                request.voter_id,
                request.election_id,
                submission.outcome.label()
            ),
            Err(e) => info!("vote of {} in election {} refused: {}", request.voter_id, request.election_id, e),
        }
        result
    }

    async fn submit(
        &self,
        request: &VoteRequest,
    ) -> VoteResult<VoteSubmission> {
        let election_id = request.election_id;
        let election = self.store.election(election_id).await?.ok_or(StorageError::NotFound {
            entity: "election",
            id: election_id,
        })?;

        // 1. Deployed
        let election_handle = election.ledger_handle.ok_or(VoteError::NotDeployed(election_id))?;

        let _guard = self
            .in_flight
            .try_acquire(InFlightKey::Vote {
                election_id,
                voter_id: request.voter_id.clone(),
            })
            .map_err(VoteError::Internal)?;

        // 2. Not yet voted
        if self.store.has_voted(election_id, &request.voter_id).await? {
            return Err(VoteError::AlreadyVoted(election_id));
        }

        // 3. Eligible
        if !election.eligible_faculties.admits(&request.faculty) {
            return Err(VoteError::NotEligible {
                election_id,
                faculty: request.faculty.clone(),
            });
        }

        // 4. Active
        if !self.ensure_active(election_id, election_handle).await? {
            return Ok(VoteSubmission {
                outcome: VoteOutcome::Cancelled,
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();
        let candidate_handle = self
            .ballot_handle(&election, request.candidate_id, &mut warnings)
            .await?;

        // 5. Submit
        let outcome = self.submit_with_resubmission(election_handle, candidate_handle).await?;

        if outcome.is_counted() {
            if let Err(e) = self.store.record_vote(election_id, &request.voter_id).await {
                let warning = format!(
                    "vote of {} in election {} is on the ledger but was not saved locally: {}",
                    request.voter_id, election_id, e
                );
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        Ok(VoteSubmission { outcome, warnings })
    }

    /// Returns `false` when the voter declined to sign the self-heal advance.
    async fn ensure_active(
        &self,
        election_id: ElectionId,
        handle: ElectionHandle,
    ) -> VoteResult<bool> {
        let details = self.ctx.gateway().election_details(handle).await?;
        let now = self.clock.now_secs();

        let reason = match details.status {
            LedgerStatus::Active if now <= details.end_secs => return Ok(true),
            LedgerStatus::Active | LedgerStatus::Completed => InactiveReason::AlreadyEnded,
            LedgerStatus::Cancelled => InactiveReason::Cancelled,
            LedgerStatus::Pending if now < details.start_secs => InactiveReason::NotYetStarted,
            LedgerStatus::Pending if now > details.end_secs => InactiveReason::AlreadyEnded,
            LedgerStatus::Pending => {
                debug!("{} still pending inside its window, syncing before vote", handle);
                match self.synchronizer.sync(handle).await {
                    Ok(outcome) if outcome.after == LedgerStatus::Active => return Ok(true),
                    Ok(outcome) if outcome.action == SyncAction::Cancelled => {
                        info!("{} self-heal advance declined by voter", handle);
                        return Ok(false);
                    }
                    Ok(outcome) => {
                        warn!("{} reports {} after sync", handle, outcome.after);
                    }
                    Err(e) => {
                        warn!("status sync of {} before vote failed: {}", handle, e);
                    }
                }
                InactiveReason::StuckPending
            }
        };

        Err(VoteError::ElectionNotActive { election_id, reason })
    }

    /// Ledger handle of the roster entry the choice lands on.
    async fn ballot_handle(
        &self,
        election: &Election,
        chosen: CandidateId,
        warnings: &mut Vec<String>,
    ) -> VoteResult<CandidateHandle> {
        let roster = self.store.roster(election.id).await?;
        let target = resolve_ballot_target(&roster, chosen).ok_or(VoteError::CandidateNotOnBallot {
            election_id: election.id,
            candidate_id: chosen,
        })?;
        if target != chosen {
            debug!("candidate {} is a running mate, voting for ticket {}", chosen, target);
        }

        let candidate = self.store.candidate(target).await?.ok_or(StorageError::NotFound {
            entity: "candidate",
            id: target,
        })?;
        if let Some(handle) = candidate.ledger_handle {
            return Ok(handle);
        }

        let student_id = candidate.stable_student_id().ok_or_else(|| {
            warn!("candidate {} has neither a ledger handle nor a student id", target);
            VoteError::CandidateNotRegistered { candidate_id: target }
        })?;
        let handle = self
            .mapper
            .resolve_candidate_handle(student_id)
            .await?
            .ok_or(VoteError::CandidateNotRegistered { candidate_id: target })?;

        if let Some(warning) = self.mapper.persist_candidate_handle(target, handle).await.warning() {
            warnings.push(warning.to_string());
        }
        Ok(handle)
    }

    async fn submit_with_resubmission(
        &self,
        election: ElectionHandle,
        candidate: CandidateHandle,
    ) -> VoteResult<VoteOutcome> {
        let gateway = self.ctx.gateway();
        let mut priority = TxPriority::Standard;
        let mut resubmissions = 0;

        loop {
            let submitted = gateway
                .submit_vote(self.ctx.account(), election, candidate, priority)
                .await;

            let e = match submitted {
                Ok(receipt) => {
                    LEDGER_WRITES.with_label_values(&["vote"]).inc();
                    return Ok(VoteOutcome::Recorded {
                        receipt,
                        resubmitted: resubmissions > 0,
                    });
                }
                Err(e) => e,
            };

            match e.kind() {
                LedgerErrorKind::AlreadyVoted => {
                    debug!("{} already holds a vote from {}", election, self.ctx.account());
                    return Ok(VoteOutcome::AlreadyRecordedOnChain);
                }
                LedgerErrorKind::UserRejected => return Ok(VoteOutcome::Cancelled),
                LedgerErrorKind::NetworkCongestion if resubmissions < self.resubmit.max_resubmissions => {
                    resubmissions += 1;
                    priority = self.resubmit.escalated_priority();
                    warn!("vote on {} hit congestion, resubmitting with {:?}: {}", election, priority, e);
                }
                LedgerErrorKind::NetworkCongestion => return Err(VoteError::NetworkCongestion(e.message)),
                LedgerErrorKind::InsufficientFunds => return Err(VoteError::InsufficientFunds(e.message)),
                _ => return Err(VoteError::Unclassified(e.to_string())),
            }
        }
    }
}
