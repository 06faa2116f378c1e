use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Election identifier assigned by the ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElectionHandle(pub u64);

/// Candidate identifier assigned by the ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateHandle(pub u64);

impl fmt::Display for ElectionHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "ledger-election#{}", self.0)
    }
}

impl fmt::Display for CandidateHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "ledger-candidate#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LedgerStatus {
    Pending = 0,
    Active = 1,
    Completed = 2,
    Cancelled = 3,
}

impl LedgerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LedgerStatus::Completed | LedgerStatus::Cancelled)
    }

    /// Position in the forward lifecycle. `Cancelled` sits outside it.
    pub(crate) fn rank(&self) -> Option<u8> {
        match self {
            LedgerStatus::Pending => Some(0),
            LedgerStatus::Active => Some(1),
            LedgerStatus::Completed => Some(2),
            LedgerStatus::Cancelled => None,
        }
    }
}

impl TryFrom<u8> for LedgerStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LedgerStatus::Pending),
            1 => Ok(LedgerStatus::Active),
            2 => Ok(LedgerStatus::Completed),
            3 => Ok(LedgerStatus::Cancelled),
            other => Err(other),
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            LedgerStatus::Pending => "Pending",
            LedgerStatus::Active => "Active",
            LedgerStatus::Completed => "Completed",
            LedgerStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

/// What the ledger reports about one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerElection {
    pub handle: ElectionHandle,
    pub status: LedgerStatus,
    pub start_secs: u64,
    pub end_secs: u64,
    pub total_votes_cast: u64,
    pub results_finalized: bool,
}

impl LedgerElection {
    /// Status the ledger should report at `now_secs`, judging only by the
    /// configured window.
    pub fn implied_status(
        &self,
        now_secs: u64,
    ) -> LedgerStatus {
        implied_status(now_secs, self.start_secs, self.end_secs)
    }

    pub fn window_contains(
        &self,
        now_secs: u64,
    ) -> bool {
        self.start_secs <= now_secs && now_secs <= self.end_secs
    }
}

/// `now < start` is Pending, `start <= now <= end` is Active, later is
/// Completed.
pub fn implied_status(
    now_secs: u64,
    start_secs: u64,
    end_secs: u64,
) -> LedgerStatus {
    if now_secs < start_secs {
        LedgerStatus::Pending
    } else if now_secs <= end_secs {
        LedgerStatus::Active
    } else {
        LedgerStatus::Completed
    }
}

/// Priority hint attached to a submission. The gateway maps it to whatever
/// fee mechanism the ledger uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxPriority {
    #[default]
    Standard,
    Escalated { bump_percent: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_id: String,
    pub block: u64,
}

/// Why an election cannot take votes right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    NotYetStarted,
    AlreadyEnded,
    /// The window is open but the ledger still reports Pending after a
    /// status sync.
    StuckPending,
    Cancelled,
}

impl fmt::Display for InactiveReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            InactiveReason::NotYetStarted => "voting has not started yet",
            InactiveReason::AlreadyEnded => "voting has already ended",
            InactiveReason::StuckPending => "ledger status is stuck at pending",
            InactiveReason::Cancelled => "election was cancelled",
        };
        f.write_str(s)
    }
}
