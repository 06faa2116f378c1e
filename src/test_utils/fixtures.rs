use crate::from_unix_seconds;
use crate::Candidate;
use crate::CandidateId;
use crate::Election;
use crate::ElectionCandidate;
use crate::ElectionId;
use crate::EligibleFaculties;
use crate::PositionCategory;
use crate::PositionRole;

/// Fixed "now" used by unit tests.
pub const NOW: u64 = 1_800_000_000;

pub fn election(
    id: ElectionId,
    category: PositionCategory,
    start_secs: u64,
    end_secs: u64,
) -> Election {
    Election {
        id,
        name: format!("election-{id}"),
        category,
        eligible_faculties: EligibleFaculties::All,
        starts_at: from_unix_seconds(start_secs),
        ends_at: from_unix_seconds(end_secs),
        ledger_handle: None,
    }
}

pub fn senator(
    id: CandidateId,
    student_id: &str,
) -> Candidate {
    candidate(id, student_id, PositionRole::Senator, None)
}

pub fn candidate(
    id: CandidateId,
    student_id: &str,
    role: PositionRole,
    running_mate: Option<CandidateId>,
) -> Candidate {
    Candidate {
        id,
        full_name: format!("candidate-{id}"),
        student_id: Some(student_id.to_string()),
        role,
        faculty: "Engineering".to_string(),
        running_mate,
        ledger_handle: None,
    }
}

pub fn roster_entry(
    election_id: ElectionId,
    candidate_id: CandidateId,
    running_mate_id: Option<CandidateId>,
) -> ElectionCandidate {
    ElectionCandidate {
        election_id,
        candidate_id,
        running_mate_id,
    }
}
