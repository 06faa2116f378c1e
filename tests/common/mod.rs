use std::sync::Arc;

use ballot_sync::from_unix_seconds;
use ballot_sync::BallotSyncConfig;
use ballot_sync::Candidate;
use ballot_sync::CandidateId;
use ballot_sync::DeploymentReconciler;
use ballot_sync::Election;
use ballot_sync::ElectionCandidate;
use ballot_sync::ElectionId;
use ballot_sync::ElectionStore;
use ballot_sync::EligibleFaculties;
use ballot_sync::InFlightRegistry;
use ballot_sync::InMemoryLedger;
use ballot_sync::LedgerContext;
use ballot_sync::ManualClock;
use ballot_sync::MemoryElectionStore;
use ballot_sync::PositionCategory;
use ballot_sync::PositionRole;
use ballot_sync::StatusSynchronizer;
use ballot_sync::VoteRequest;
use ballot_sync::VoteSubmissionCoordinator;

pub const NOW: u64 = 1_900_000_000;
pub const ADMIN: &str = "election-admin";

/// One university: a ledger, a local store and a shared clock.
pub struct World {
    pub clock: Arc<ManualClock>,
    pub ledger: Arc<InMemoryLedger>,
    pub store: Arc<MemoryElectionStore>,
    pub config: BallotSyncConfig,
    pub in_flight: InFlightRegistry,
}

impl World {
    pub fn new(now_secs: u64) -> Self {
        crate::enable_logger();
        let clock = Arc::new(ManualClock::at_secs(now_secs));
        Self {
            ledger: Arc::new(InMemoryLedger::new(clock.clone())),
            clock,
            store: Arc::new(MemoryElectionStore::new()),
            config: BallotSyncConfig::default(),
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn admin(&self) -> LedgerContext<InMemoryLedger> {
        LedgerContext::new(self.ledger.clone(), ADMIN)
    }

    pub fn reconciler(&self) -> DeploymentReconciler<InMemoryLedger, MemoryElectionStore> {
        DeploymentReconciler::new(self.admin(), self.store.clone(), self.in_flight.clone())
    }

    pub fn synchronizer(&self) -> StatusSynchronizer<InMemoryLedger, MemoryElectionStore> {
        StatusSynchronizer::new(
            self.admin(),
            self.store.clone(),
            self.clock.clone(),
            self.config.sync.clone(),
        )
    }

    /// Coordinator signed by the voter's own account.
    pub fn voter(
        &self,
        account: &str,
    ) -> VoteSubmissionCoordinator<InMemoryLedger, MemoryElectionStore> {
        VoteSubmissionCoordinator::new(
            self.admin().with_account(account),
            self.store.clone(),
            self.clock.clone(),
            &self.config,
            self.in_flight.clone(),
        )
    }

    /// Stores a senate election open to every faculty with one roster line
    /// per `(candidate id, student id)`.
    pub async fn seed_senate(
        &self,
        id: ElectionId,
        start_secs: u64,
        end_secs: u64,
        candidates: &[(CandidateId, &str)],
    ) {
        self.store
            .upsert_election(Election {
                id,
                name: format!("Senate {id}"),
                category: PositionCategory::Senator,
                eligible_faculties: EligibleFaculties::All,
                starts_at: from_unix_seconds(start_secs),
                ends_at: from_unix_seconds(end_secs),
                ledger_handle: None,
            })
            .await
            .unwrap();

        for (candidate_id, student_id) in candidates {
            self.store
                .upsert_candidate(Candidate {
                    id: *candidate_id,
                    full_name: format!("Senator {candidate_id}"),
                    student_id: Some(student_id.to_string()),
                    role: PositionRole::Senator,
                    faculty: "Engineering".to_string(),
                    running_mate: None,
                    ledger_handle: None,
                })
                .await
                .unwrap();
            self.store
                .add_roster_entry(ElectionCandidate {
                    election_id: id,
                    candidate_id: *candidate_id,
                    running_mate_id: None,
                })
                .await
                .unwrap();
        }
    }
}

pub fn ballot(
    election_id: ElectionId,
    candidate_id: CandidateId,
    voter_id: &str,
) -> VoteRequest {
    VoteRequest {
        election_id,
        candidate_id,
        voter_id: voter_id.to_string(),
        faculty: "Engineering".to_string(),
    }
}
