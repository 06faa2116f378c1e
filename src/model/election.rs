use std::collections::BTreeSet;
use std::fmt;
use std::time::SystemTime;

use serde::Deserialize;
use serde::Serialize;

use crate::unix_seconds;
use crate::DefinitionError;
use crate::ElectionHandle;
use crate::ALL_FACULTIES_SENTINEL;

/// Database-assigned election id.
pub type ElectionId = u64;

/// Ballot category. Also the category enum the ledger contract accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionCategory {
    PresidentVicePresident,
    Senator,
}

impl PositionCategory {
    /// Paired positions are voted on as a ticket of two candidates.
    pub fn is_paired(&self) -> bool {
        matches!(self, PositionCategory::PresidentVicePresident)
    }

    /// Discriminant used by the ledger contract.
    pub fn ledger_code(&self) -> u8 {
        match self {
            PositionCategory::PresidentVicePresident => 0,
            PositionCategory::Senator => 1,
        }
    }
}

impl fmt::Display for PositionCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            PositionCategory::PresidentVicePresident => write!(f, "president/vice-president"),
            PositionCategory::Senator => write!(f, "senator"),
        }
    }
}

/// Faculties allowed to vote in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibleFaculties {
    All,
    Only(BTreeSet<String>),
}

impl EligibleFaculties {
    /// Builds the set from raw stored values. An empty list or one that
    /// contains the "all" sentinel means every faculty.
    pub fn from_list<I, S>(faculties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for faculty in faculties {
            let faculty = faculty.as_ref().trim();
            if faculty.is_empty() {
                continue;
            }
            if faculty.eq_ignore_ascii_case(ALL_FACULTIES_SENTINEL) {
                return EligibleFaculties::All;
            }
            set.insert(faculty.to_string());
        }

        if set.is_empty() {
            EligibleFaculties::All
        } else {
            EligibleFaculties::Only(set)
        }
    }

    pub fn admits(
        &self,
        faculty: &str,
    ) -> bool {
        match self {
            EligibleFaculties::All => true,
            EligibleFaculties::Only(set) => set.iter().any(|f| f.eq_ignore_ascii_case(faculty.trim())),
        }
    }
}

/// Status derived from the configured instants. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalStatus {
    Upcoming,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub category: PositionCategory,
    pub eligible_faculties: EligibleFaculties,
    pub starts_at: SystemTime,
    pub ends_at: SystemTime,
    /// `None` until the election is deployed to the ledger.
    pub ledger_handle: Option<ElectionHandle>,
}

impl Election {
    pub fn is_deployed(&self) -> bool {
        self.ledger_handle.is_some()
    }

    pub fn local_status(
        &self,
        now: SystemTime,
    ) -> LocalStatus {
        if now < self.starts_at {
            LocalStatus::Upcoming
        } else if now <= self.ends_at {
            LocalStatus::Active
        } else {
            LocalStatus::Completed
        }
    }

    /// Start and end as whole unix seconds, truncated.
    pub fn ledger_window(&self) -> Result<(u64, u64), DefinitionError> {
        let start = unix_seconds(self.starts_at)?;
        let end = unix_seconds(self.ends_at)?;
        if end < start {
            return Err(DefinitionError::InvalidSchedule { election_id: self.id });
        }
        Ok((start, end))
    }

    /// Rejects changes to the fields the ledger copy was created from once a
    /// ledger handle exists.
    pub fn check_definition_change(
        &self,
        updated: &Election,
    ) -> Result<(), DefinitionError> {
        if updated.ends_at < updated.starts_at {
            return Err(DefinitionError::InvalidSchedule { election_id: updated.id });
        }

        if self.ledger_handle.is_none() {
            return Ok(());
        }

        let locked = if self.category != updated.category {
            Some("category")
        } else if self.starts_at != updated.starts_at {
            Some("start instant")
        } else if self.ends_at != updated.ends_at {
            Some("end instant")
        } else if self.ledger_handle != updated.ledger_handle && updated.ledger_handle.is_some() {
            Some("ledger handle")
        } else {
            None
        };

        match locked {
            Some(field) => Err(DefinitionError::LockedByLedgerHandle {
                election_id: self.id,
                field,
            }),
            None => Ok(()),
        }
    }
}
