use std::fmt;

use crate::CandidateId;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::LedgerErrorKind;

/// One ledger-facing step of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    RegisterCandidate { candidate_id: CandidateId },
    CreateElection { election_id: ElectionId },
    AttachCandidate { candidate_id: CandidateId },
}

impl DeployStep {
    pub fn label(&self) -> &'static str {
        match self {
            DeployStep::RegisterCandidate { .. } => "register_candidate",
            DeployStep::CreateElection { .. } => "create_election",
            DeployStep::AttachCandidate { .. } => "attach_candidate",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DeployStep::RegisterCandidate { candidate_id } => write!(f, "register candidate {candidate_id}"),
            DeployStep::CreateElection { election_id } => write!(f, "create election {election_id}"),
            DeployStep::AttachCandidate { candidate_id } => write!(f, "attach candidate {candidate_id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResolution {
    /// A transaction was written for this step.
    Submitted,
    /// The ledger already held the result; nothing was written.
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSuccess {
    pub step: DeployStep,
    pub resolution: StepResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Ledger(LedgerErrorKind),
    /// An earlier step this one depends on did not produce a handle.
    MissingPrerequisite,
    /// The local record is missing or unreadable.
    LocalRecord,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Ledger(kind) => kind.label(),
            FailureKind::MissingPrerequisite => "missing_prerequisite",
            FailureKind::LocalRecord => "local_record",
        }
    }

    /// The signer declined; a cancellation rather than a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FailureKind::Ledger(LedgerErrorKind::UserRejected))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: DeployStep,
    /// Human-readable name of the entity, for rendering.
    pub entity: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Aggregate outcome of one deployment. Individual failures never stop the
/// batch; the caller decides whether the result is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    pub election_id: ElectionId,
    pub election_handle: Option<ElectionHandle>,
    pub succeeded: Vec<StepSuccess>,
    pub failed: Vec<StepFailure>,
    /// Degraded successes and skipped entries.
    pub warnings: Vec<String>,
    /// Transactions actually written during this run.
    pub ledger_writes: usize,
}

impl DeploymentReport {
    pub(crate) fn new(election_id: ElectionId) -> Self {
        Self {
            election_id,
            election_handle: None,
            succeeded: Vec::new(),
            failed: Vec::new(),
            warnings: Vec::new(),
            ledger_writes: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn succeeded_for(
        &self,
        step: DeployStep,
    ) -> Option<&StepSuccess> {
        self.succeeded.iter().find(|s| s.step == step)
    }

    pub fn failed_for(
        &self,
        step: DeployStep,
    ) -> Option<&StepFailure> {
        self.failed.iter().find(|f| f.step == step)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "election {}: {} succeeded, {} failed",
            self.election_id,
            self.succeeded.len(),
            self.failed.len()
        );
        for failure in &self.failed {
            summary.push_str(&format!("\n  {} ({}): {}", failure.step, failure.entity, failure.message));
        }
        summary
    }

    pub(crate) fn record_success(
        &mut self,
        step: DeployStep,
        resolution: StepResolution,
    ) {
        if resolution == StepResolution::Submitted {
            self.ledger_writes += 1;
        }
        self.succeeded.push(StepSuccess { step, resolution });
    }

    pub(crate) fn record_failure(
        &mut self,
        step: DeployStep,
        entity: String,
        kind: FailureKind,
        message: String,
    ) {
        self.failed.push(StepFailure {
            step,
            entity,
            kind,
            message,
        });
    }

    pub(crate) fn warn(
        &mut self,
        warning: impl Into<String>,
    ) {
        self.warnings.push(warning.into());
    }
}
