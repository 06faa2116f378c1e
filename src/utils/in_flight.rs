use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::ElectionId;
use crate::Error;
use crate::Result;

/// An entity with a ledger action in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InFlightKey {
    Deploy(ElectionId),
    Vote { election_id: ElectionId, voter_id: String },
}

impl fmt::Display for InFlightKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            InFlightKey::Deploy(id) => write!(f, "deployment of election {id}"),
            InFlightKey::Vote { election_id, voter_id } => {
                write!(f, "vote of {voter_id} in election {election_id}")
            }
        }
    }
}

/// Marks individual entities busy while their ledger chain runs.
///
/// Unrelated entities never block each other.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    entries: Arc<DashMap<InFlightKey, ()>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(
        &self,
        key: InFlightKey,
    ) -> Result<InFlightGuard> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(_) => {
                debug!("{} rejected: already in flight", key);
                Err(Error::InFlight {
                    entity: key.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightGuard {
                    entries: self.entries.clone(),
                    key,
                })
            }
        }
    }

    pub fn is_in_flight(
        &self,
        key: &InFlightKey,
    ) -> bool {
        self.entries.contains_key(key)
    }
}

/// Releases the entity when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    entries: Arc<DashMap<InFlightKey, ()>>,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.entries.remove(&self.key);
    }
}
