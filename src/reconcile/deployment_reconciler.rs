use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::DeployStep;
use super::DeploymentReport;
use super::FailureKind;
use super::StepResolution;
use crate::Candidate;
use crate::CandidateHandle;
use crate::CandidateId;
use crate::Election;
use crate::ElectionCandidate;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::Error;
use crate::IdentityMapper;
use crate::InFlightKey;
use crate::InFlightRegistry;
use crate::LedgerContext;
use crate::LedgerErrorKind;
use crate::LedgerGateway;
use crate::Result;
use crate::StorageError;
use crate::LEDGER_WRITES;
use crate::RECONCILE_STEP_FAILURES;

/// Brings the ledger in line with one local election and its roster.
///
/// Steps run in a fixed order: candidate registration, election creation,
/// candidate attachment. Each step is safe to repeat; "already exists"
/// style reverts count as success.
pub struct DeploymentReconciler<L, S> {
    ctx: LedgerContext<L>,
    store: Arc<S>,
    mapper: IdentityMapper<L, S>,
    in_flight: InFlightRegistry,
}

impl<L, S> DeploymentReconciler<L, S>
where
    L: LedgerGateway,
    S: ElectionStore,
{
    pub fn new(
        ctx: LedgerContext<L>,
        store: Arc<S>,
        in_flight: InFlightRegistry,
    ) -> Self {
        let mapper = IdentityMapper::new(ctx.clone(), store.clone());
        Self {
            ctx,
            store,
            mapper,
            in_flight,
        }
    }

    /// Deploys `election_id`.
    ///
    /// Returns `Err` only when the deployment cannot start: the election is
    /// unknown, already being deployed, or has an invalid schedule. Every
    /// ledger step outcome goes into the report.
    pub async fn deploy(
        &self,
        election_id: ElectionId,
    ) -> Result<DeploymentReport> {
        let _guard = self.in_flight.try_acquire(InFlightKey::Deploy(election_id))?;

        let election = self.store.election(election_id).await?.ok_or(StorageError::NotFound {
            entity: "election",
            id: election_id,
        })?;
        let (start_secs, end_secs) = election.ledger_window()?;
        let roster = self.store.roster(election_id).await?;
        info!(
            "deploying election {} ({}) with {} roster entries",
            election_id,
            election.name,
            roster.len()
        );

        let mut report = DeploymentReport::new(election_id);

        // 1. Candidates
        let handles = self.register_candidates(&roster, &mut report).await;

        // 2. Election
        let election_handle = self
            .ensure_election(&election, start_secs, end_secs, &mut report)
            .await;
        report.election_handle = election_handle;

        // 3. Attachments
        match election_handle {
            Some(handle) => self.attach_candidates(handle, &roster, &handles, &mut report).await,
            None => {
                for entry in &roster {
                    report.record_failure(
                        DeployStep::AttachCandidate {
                            candidate_id: entry.candidate_id,
                        },
                        format!("candidate {}", entry.candidate_id),
                        FailureKind::MissingPrerequisite,
                        "election has no ledger handle".to_string(),
                    );
                }
            }
        }

        for failure in &report.failed {
            RECONCILE_STEP_FAILURES
                .with_label_values(&[failure.step.label(), failure.kind.label()])
                .inc();
        }

        if report.is_complete() {
            info!("{}", report.summary());
        } else {
            warn!("{}", report.summary());
        }
        Ok(report)
    }

    /// Candidate ids on the roster, ticket heads before their running mates,
    /// without duplicates.
    fn roster_candidate_ids(roster: &[ElectionCandidate]) -> Vec<CandidateId> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for entry in roster {
            for id in std::iter::once(entry.candidate_id).chain(entry.running_mate_id) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    async fn register_candidates(
        &self,
        roster: &[ElectionCandidate],
        report: &mut DeploymentReport,
    ) -> HashMap<CandidateId, CandidateSlot> {
        let mut handles = HashMap::new();

        for candidate_id in Self::roster_candidate_ids(roster) {
            let step = DeployStep::RegisterCandidate { candidate_id };

            let candidate = match self.store.candidate(candidate_id).await {
                Ok(Some(candidate)) => candidate,
                Ok(None) => {
                    report.record_failure(
                        step,
                        format!("candidate {candidate_id}"),
                        FailureKind::LocalRecord,
                        "candidate record not found".to_string(),
                    );
                    handles.insert(candidate_id, CandidateSlot::Failed);
                    continue;
                }
                Err(e) => {
                    error!("reading candidate {} failed: {:?}", candidate_id, e);
                    report.record_failure(
                        step,
                        format!("candidate {candidate_id}"),
                        FailureKind::LocalRecord,
                        e.to_string(),
                    );
                    handles.insert(candidate_id, CandidateSlot::Failed);
                    continue;
                }
            };

            let slot = self.register_candidate(&candidate, step, report).await;
            handles.insert(candidate_id, slot);
        }

        handles
    }

    async fn register_candidate(
        &self,
        candidate: &Candidate,
        step: DeployStep,
        report: &mut DeploymentReport,
    ) -> CandidateSlot {
        if let Some(handle) = candidate.ledger_handle {
            debug!("candidate {} already mapped to {}", candidate.id, handle);
            report.record_success(step, StepResolution::AlreadyPresent);
            return CandidateSlot::Ready(handle);
        }

        let Some(student_id) = candidate.stable_student_id() else {
            report.warn(format!(
                "candidate {} ({}) has no student id and was skipped",
                candidate.id, candidate.full_name
            ));
            warn!("candidate {} has no student id, skipping", candidate.id);
            return CandidateSlot::Skipped;
        };

        match self.mapper.ensure_candidate_handle(student_id).await {
            Ok(registration) => {
                let resolution = if registration.wrote_ledger() {
                    StepResolution::Submitted
                } else {
                    StepResolution::AlreadyPresent
                };
                report.record_success(step, resolution);

                let persisted = self
                    .mapper
                    .persist_candidate_handle(candidate.id, registration.handle)
                    .await;
                if let Some(warning) = persisted.warning() {
                    report.warn(warning);
                }
                CandidateSlot::Ready(registration.handle)
            }
            Err(e) => {
                report.record_failure(step, describe(candidate), failure_kind(&e), e.to_string());
                CandidateSlot::Failed
            }
        }
    }

    async fn ensure_election(
        &self,
        election: &Election,
        start_secs: u64,
        end_secs: u64,
        report: &mut DeploymentReport,
    ) -> Option<ElectionHandle> {
        let step = DeployStep::CreateElection {
            election_id: election.id,
        };
        let entity = format!("election {} ({})", election.id, election.name);

        if let Some(handle) = election.ledger_handle {
            debug!("election {} already mapped to {}", election.id, handle);
            report.record_success(step, StepResolution::AlreadyPresent);
            return Some(handle);
        }

        let gateway = self.ctx.gateway();
        let created = gateway
            .create_election(self.ctx.account(), election.category, start_secs, end_secs)
            .await;

        let (handle, resolution) = match created {
            Ok(handle) => {
                LEDGER_WRITES.with_label_values(&["createElection"]).inc();
                info!("election {} created on ledger as {}", election.id, handle);
                (handle, StepResolution::Submitted)
            }
            Err(e) if e.kind() == LedgerErrorKind::ElectionExists => {
                match gateway.find_election(election.category, start_secs, end_secs).await {
                    Ok(Some(handle)) => match self.store.election_by_handle(handle).await {
                        Ok(Some(owner)) if owner != election.id => {
                            warn!(
                                "election {} collides with {} already mapped to local election {}",
                                election.id, handle, owner
                            );
                            report.record_failure(
                                step,
                                entity,
                                FailureKind::Ledger(LedgerErrorKind::ElectionExists),
                                format!("{e}; {handle} belongs to local election {owner}"),
                            );
                            return None;
                        }
                        Ok(_) => {
                            debug!("election {} already on ledger as {}", election.id, handle);
                            (handle, StepResolution::AlreadyPresent)
                        }
                        Err(lookup) => {
                            report.record_failure(step, entity, FailureKind::LocalRecord, lookup.to_string());
                            return None;
                        }
                    },
                    Ok(None) => {
                        report.record_failure(
                            step,
                            entity,
                            FailureKind::Ledger(LedgerErrorKind::ElectionExists),
                            format!("{e}; no matching election found on lookup"),
                        );
                        return None;
                    }
                    Err(lookup) => {
                        report.record_failure(
                            step,
                            entity,
                            FailureKind::Ledger(lookup.kind()),
                            lookup.to_string(),
                        );
                        return None;
                    }
                }
            }
            Err(e) => {
                report.record_failure(step, entity, FailureKind::Ledger(e.kind()), e.to_string());
                return None;
            }
        };

        report.record_success(step, resolution);
        let persisted = self.mapper.persist_election_handle(election.id, handle).await;
        if let Some(warning) = persisted.warning() {
            report.warn(warning);
        }
        Some(handle)
    }

    async fn attach_candidates(
        &self,
        election_handle: ElectionHandle,
        roster: &[ElectionCandidate],
        handles: &HashMap<CandidateId, CandidateSlot>,
        report: &mut DeploymentReport,
    ) {
        let gateway = self.ctx.gateway();
        let attached: HashSet<CandidateHandle> = match gateway.election_candidates(election_handle).await {
            Ok(list) => list.into_iter().collect(),
            Err(e) => {
                warn!("could not list candidates of {}: {}", election_handle, e);
                report.warn(format!(
                    "could not read current candidates of {election_handle}, attaching without pre-check"
                ));
                HashSet::new()
            }
        };

        for entry in roster {
            let candidate_id = entry.candidate_id;
            let step = DeployStep::AttachCandidate { candidate_id };

            let candidate_handle = match handles.get(&candidate_id) {
                Some(CandidateSlot::Ready(handle)) => *handle,
                Some(CandidateSlot::Skipped) => {
                    report.warn(format!(
                        "candidate {candidate_id} was not attached because it has no ledger registration"
                    ));
                    continue;
                }
                Some(CandidateSlot::Failed) | None => {
                    report.record_failure(
                        step,
                        format!("candidate {candidate_id}"),
                        FailureKind::MissingPrerequisite,
                        "candidate has no ledger handle".to_string(),
                    );
                    continue;
                }
            };

            if attached.contains(&candidate_handle) {
                report.record_success(step, StepResolution::AlreadyPresent);
                continue;
            }

            match gateway
                .attach_candidate(self.ctx.account(), election_handle, candidate_handle)
                .await
            {
                Ok(()) => {
                    LEDGER_WRITES.with_label_values(&["addCandidateToElection"]).inc();
                    report.record_success(step, StepResolution::Submitted);
                }
                Err(e) if e.kind() == LedgerErrorKind::AlreadyAttached => {
                    report.record_success(step, StepResolution::AlreadyPresent);
                }
                Err(e) => {
                    report.record_failure(
                        step,
                        format!("candidate {candidate_id}"),
                        FailureKind::Ledger(e.kind()),
                        e.to_string(),
                    );
                }
            }
        }
    }
}

/// Per-candidate result of the registration step.
#[derive(Debug, Clone, Copy)]
enum CandidateSlot {
    Ready(CandidateHandle),
    Skipped,
    Failed,
}

fn describe(candidate: &Candidate) -> String {
    format!("candidate {} ({})", candidate.id, candidate.full_name)
}

fn failure_kind(e: &Error) -> FailureKind {
    match e.ledger_kind() {
        Some(kind) => FailureKind::Ledger(kind),
        None => FailureKind::LocalRecord,
    }
}
