use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::merge_election_update;
use crate::Candidate;
use crate::CandidateHandle;
use crate::CandidateId;
use crate::Election;
use crate::ElectionCandidate;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::Result;
use crate::StorageConfig;
use crate::StorageError;
use crate::CANDIDATES_TREE;
use crate::ELECTIONS_TREE;
use crate::ROSTER_TREE;
use crate::VOTERS_TREE;

/// Opens the sled database described by `config`.
pub fn init_sled_db(config: &StorageConfig) -> Result<sled::Db> {
    debug!("init_sled_db from path: {:?}", &config.db_path);

    sled::Config::default()
        .path(&config.db_path)
        .temporary(config.temporary)
        .cache_capacity(config.cache_capacity_bytes)
        .use_compression(true)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            warn!(
                "Try to open DB at this location: {:?} and failed: {:?}",
                config.db_path, e
            );
            StorageError::Sled(e).into()
        })
}

/// Sled-backed election store. Records are bincode-encoded.
#[derive(Clone)]
pub struct SledElectionStore {
    db: sled::Db,
    elections: sled::Tree,
    candidates: sled::Tree,
    roster: sled::Tree,
    voters: sled::Tree,
}

impl std::fmt::Debug for SledElectionStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledElectionStore")
            .field("elections", &self.elections.len())
            .field("candidates", &self.candidates.len())
            .finish()
    }
}

impl SledElectionStore {
    pub fn new(db: sled::Db) -> Result<Self> {
        Ok(Self {
            elections: db.open_tree(ELECTIONS_TREE).map_err(StorageError::from)?,
            candidates: db.open_tree(CANDIDATES_TREE).map_err(StorageError::from)?,
            roster: db.open_tree(ROSTER_TREE).map_err(StorageError::from)?,
            voters: db.open_tree(VOTERS_TREE).map_err(StorageError::from)?,
            db,
        })
    }

    pub fn open(config: &StorageConfig) -> Result<Self> {
        Self::new(init_sled_db(config)?)
    }

    async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(StorageError::from)?;
        Ok(())
    }
}

fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

fn roster_key(
    election_id: ElectionId,
    candidate_id: CandidateId,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&election_id.to_be_bytes());
    key.extend_from_slice(&candidate_id.to_be_bytes());
    key
}

fn voter_key(
    election_id: ElectionId,
    voter_id: &str,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + voter_id.len());
    key.extend_from_slice(&election_id.to_be_bytes());
    key.extend_from_slice(voter_id.as_bytes());
    key
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value).map_err(StorageError::from)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes).map_err(StorageError::from)?)
}

fn get_record<T: DeserializeOwned>(
    tree: &sled::Tree,
    id: u64,
) -> Result<Option<T>> {
    match tree.get(id_key(id)).map_err(StorageError::from)? {
        Some(ivec) => Ok(Some(decode(&ivec)?)),
        None => Ok(None),
    }
}

fn put_record<T: Serialize>(
    tree: &sled::Tree,
    id: u64,
    value: &T,
) -> Result<()> {
    tree.insert(id_key(id), encode(value)?).map_err(StorageError::from)?;
    Ok(())
}

#[async_trait::async_trait]
impl ElectionStore for SledElectionStore {
    async fn election(
        &self,
        id: ElectionId,
    ) -> Result<Option<Election>> {
        get_record(&self.elections, id)
    }

    async fn candidate(
        &self,
        id: CandidateId,
    ) -> Result<Option<Candidate>> {
        get_record(&self.candidates, id)
    }

    async fn roster(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<ElectionCandidate>> {
        let mut entries = Vec::new();
        for item in self.roster.scan_prefix(id_key(election_id)) {
            let (_, value) = item.map_err(StorageError::from)?;
            entries.push(decode(&value)?);
        }
        Ok(entries)
    }

    async fn upsert_election(
        &self,
        election: Election,
    ) -> Result<()> {
        let existing: Option<Election> = get_record(&self.elections, election.id)?;
        let merged = merge_election_update(existing.as_ref(), election)?;
        put_record(&self.elections, merged.id, &merged)
    }

    async fn election_by_handle(
        &self,
        handle: ElectionHandle,
    ) -> Result<Option<ElectionId>> {
        for item in self.elections.iter() {
            let (_, value) = item.map_err(StorageError::from)?;
            let election: Election = decode(&value)?;
            if election.ledger_handle == Some(handle) {
                return Ok(Some(election.id));
            }
        }
        Ok(None)
    }

    async fn upsert_candidate(
        &self,
        candidate: Candidate,
    ) -> Result<()> {
        put_record(&self.candidates, candidate.id, &candidate)
    }

    async fn add_roster_entry(
        &self,
        entry: ElectionCandidate,
    ) -> Result<()> {
        self.roster
            .insert(roster_key(entry.election_id, entry.candidate_id), encode(&entry)?)
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn set_election_handle(
        &self,
        id: ElectionId,
        handle: ElectionHandle,
    ) -> Result<()> {
        let mut election: Election = get_record(&self.elections, id)?.ok_or(StorageError::NotFound {
            entity: "election",
            id,
        })?;
        election.ledger_handle = Some(handle);
        put_record(&self.elections, id, &election)?;
        self.flush().await
    }

    async fn set_candidate_handle(
        &self,
        id: CandidateId,
        handle: CandidateHandle,
    ) -> Result<()> {
        let mut candidate: Candidate = get_record(&self.candidates, id)?.ok_or(StorageError::NotFound {
            entity: "candidate",
            id,
        })?;
        candidate.ledger_handle = Some(handle);
        put_record(&self.candidates, id, &candidate)?;
        self.flush().await
    }

    async fn has_voted(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<bool> {
        Ok(self
            .voters
            .contains_key(voter_key(election_id, voter_id))
            .map_err(StorageError::from)?)
    }

    async fn record_vote(
        &self,
        election_id: ElectionId,
        voter_id: &str,
    ) -> Result<()> {
        self.voters
            .insert(voter_key(election_id, voter_id), &[1u8][..])
            .map_err(StorageError::from)?;
        self.flush().await
    }
}
