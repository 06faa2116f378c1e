//! Election Synchronization Error Hierarchy
//!
//! Defines the error types shared by the identity mapper, the deployment
//! reconciler, the status synchronizer and the vote coordinator, grouped by
//! the layer that produced them.

use config::ConfigError;

use crate::classify_ledger_error;
use crate::ElectionId;
use crate::InactiveReason;
use crate::LedgerErrorKind;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration source or deserialization failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Local persistence failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Raw failures reported by the external ledger
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Local election definition rules
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The election has no ledger handle yet
    #[error("election {0} has not been deployed to the ledger")]
    NotDeployed(ElectionId),

    /// Another action on the same entity has not finished yet
    #[error("{entity} is already being processed")]
    InFlight { entity: String },
}

impl Error {
    /// Ledger failure kind, if this error came from the ledger.
    pub fn ledger_kind(&self) -> Option<LedgerErrorKind> {
        match self {
            Error::Ledger(e) => Some(e.kind()),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Embedded database errors
    #[error(transparent)]
    Sled(#[from] sled::Error),

    /// Serialization failures for persisted records
    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Injected or backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A failure reported by the ledger gateway.
///
/// The contract only surfaces human-readable revert strings, so the raw
/// message is kept verbatim and classified on demand.
#[derive(Debug, Clone, thiserror::Error)]
#[error("ledger {operation} failed: {message}")]
pub struct LedgerError {
    pub operation: &'static str,
    pub message: String,
}

impl LedgerError {
    pub fn new(
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> LedgerErrorKind {
        classify_ledger_error(&self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// Schedule or category edits after deployment would silently mismatch
    /// the ledger copy.
    #[error("election {election_id} is deployed to the ledger; {field} can no longer change")]
    LockedByLedgerHandle {
        election_id: ElectionId,
        field: &'static str,
    },

    #[error("election {election_id} ends before it starts")]
    InvalidSchedule { election_id: ElectionId },

    #[error("instant precedes the unix epoch")]
    PreEpochInstant,
}

/// Terminal outcomes of a single vote attempt that are not a recorded vote.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("election {0} has not been deployed to the ledger")]
    NotDeployed(ElectionId),

    /// Covers both the local short-circuit and a local record that already
    /// exists.
    #[error("voter has already voted in election {0}")]
    AlreadyVoted(ElectionId),

    #[error("faculty {faculty} is not eligible for election {election_id}")]
    NotEligible {
        election_id: ElectionId,
        faculty: String,
    },

    #[error("election {election_id} is not active: {reason}")]
    ElectionNotActive {
        election_id: ElectionId,
        reason: InactiveReason,
    },

    #[error("candidate {candidate_id} is not on the ballot of election {election_id}")]
    CandidateNotOnBallot { election_id: ElectionId, candidate_id: u64 },

    #[error("candidate {candidate_id} has no ledger registration")]
    CandidateNotRegistered { candidate_id: u64 },

    #[error("network congestion persisted after resubmission: {0}")]
    NetworkCongestion(String),

    #[error("insufficient funds to submit vote: {0}")]
    InsufficientFunds(String),

    #[error("vote submission failed: {0}")]
    Unclassified(String),

    #[error(transparent)]
    Internal(#[from] Error),
}

impl VoteError {
    /// Metric label of this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            VoteError::NotDeployed(_) => "not_deployed",
            VoteError::AlreadyVoted(_) => "already_voted",
            VoteError::NotEligible { .. } => "not_eligible",
            VoteError::ElectionNotActive { .. } => "not_active",
            VoteError::CandidateNotOnBallot { .. } => "not_on_ballot",
            VoteError::CandidateNotRegistered { .. } => "candidate_not_registered",
            VoteError::NetworkCongestion(_) => "network_congestion",
            VoteError::InsufficientFunds(_) => "insufficient_funds",
            VoteError::Unclassified(_) => "unclassified",
            VoteError::Internal(_) => "internal",
        }
    }
}

impl From<StorageError> for VoteError {
    fn from(e: StorageError) -> Self {
        VoteError::Internal(e.into())
    }
}

impl From<LedgerError> for VoteError {
    fn from(e: LedgerError) -> Self {
        VoteError::Internal(e.into())
    }
}
