//! Classification of ledger failure messages.
//!
//! The contract and wallet only report human-readable strings, so every
//! pattern the crate relies on lives in this file.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerErrorKind {
    /// The signer declined the transaction.
    UserRejected,
    /// Fee or mempool pressure; a resubmission with higher priority may pass.
    NetworkCongestion,
    InsufficientFunds,
    /// Candidate registration already exists for the student id.
    AlreadyRegistered,
    /// An election with identical parameters already exists.
    ElectionExists,
    /// Candidate already attached to the election.
    AlreadyAttached,
    AlreadyVoted,
    /// Status advance had nothing to do.
    StatusUnchanged,
    NotFound,
    Unclassified,
}

impl LedgerErrorKind {
    /// Conflicts signal that an earlier attempt already completed the write.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            LedgerErrorKind::AlreadyRegistered
                | LedgerErrorKind::ElectionExists
                | LedgerErrorKind::AlreadyAttached
                | LedgerErrorKind::AlreadyVoted
                | LedgerErrorKind::StatusUnchanged
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            LedgerErrorKind::UserRejected => "user_rejected",
            LedgerErrorKind::NetworkCongestion => "network_congestion",
            LedgerErrorKind::InsufficientFunds => "insufficient_funds",
            LedgerErrorKind::AlreadyRegistered => "already_registered",
            LedgerErrorKind::ElectionExists => "election_exists",
            LedgerErrorKind::AlreadyAttached => "already_attached",
            LedgerErrorKind::AlreadyVoted => "already_voted",
            LedgerErrorKind::StatusUnchanged => "status_unchanged",
            LedgerErrorKind::NotFound => "not_found",
            LedgerErrorKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for LedgerErrorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Checked in order; the first matching group wins. Wallet-level failures
/// come before contract reverts because wallets wrap the revert text.
const PATTERNS: &[(&[&str], LedgerErrorKind)] = &[
    (
        &["user rejected", "user denied", "rejected by user", "action_rejected"],
        LedgerErrorKind::UserRejected,
    ),
    (
        &["insufficient funds", "insufficient balance"],
        LedgerErrorKind::InsufficientFunds,
    ),
    (
        &[
            "underpriced",
            "fee too low",
            "less than block base fee",
            "congest",
            "not mined within",
            "request timed out",
        ],
        LedgerErrorKind::NetworkCongestion,
    ),
    (&["already voted"], LedgerErrorKind::AlreadyVoted),
    (&["already registered"], LedgerErrorKind::AlreadyRegistered),
    (&["already added", "already attached"], LedgerErrorKind::AlreadyAttached),
    (&["already exists"], LedgerErrorKind::ElectionExists),
    (
        &["status unchanged", "no status change", "status already"],
        LedgerErrorKind::StatusUnchanged,
    ),
    (
        &["not registered", "not found", "does not exist"],
        LedgerErrorKind::NotFound,
    ),
];

/// Maps a raw ledger or wallet message to a failure kind.
pub fn classify_ledger_error(raw: &str) -> LedgerErrorKind {
    let message = raw.to_ascii_lowercase();
    PATTERNS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| message.contains(needle)))
        .map(|(_, kind)| *kind)
        .unwrap_or(LedgerErrorKind::Unclassified)
}
