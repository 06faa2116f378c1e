use serde::Deserialize;
use serde::Serialize;

use crate::CandidateHandle;
use crate::ElectionId;

/// Database-assigned candidate id.
pub type CandidateId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionRole {
    President,
    VicePresident,
    Senator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    /// University student id, the join key with ledger registrations.
    pub student_id: Option<String>,
    pub role: PositionRole,
    pub faculty: String,
    /// Only meaningful for paired positions.
    pub running_mate: Option<CandidateId>,
    pub ledger_handle: Option<CandidateHandle>,
}

impl Candidate {
    /// The student id, unless it is missing or blank.
    pub fn stable_student_id(&self) -> Option<&str> {
        self.student_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One ballot line. For paired positions only the ticket head carries the
/// running-mate pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCandidate {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub running_mate_id: Option<CandidateId>,
}

/// Resolves which roster entry a ballot choice lands on.
///
/// Choosing the running mate of a ticket counts for the ticket head.
pub fn resolve_ballot_target(
    roster: &[ElectionCandidate],
    chosen: CandidateId,
) -> Option<CandidateId> {
    if let Some(ticket) = roster.iter().find(|entry| entry.running_mate_id == Some(chosen)) {
        return Some(ticket.candidate_id);
    }

    roster
        .iter()
        .find(|entry| entry.candidate_id == chosen)
        .map(|entry| entry.candidate_id)
}
