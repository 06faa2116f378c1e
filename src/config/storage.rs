use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Delete the database when it is dropped
    #[serde(default)]
    pub temporary: bool,

    #[serde(default = "default_cache_capacity_bytes")]
    pub cache_capacity_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            temporary: false,
            cache_capacity_bytes: default_cache_capacity_bytes(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() && !self.temporary {
            return Err(invalid("storage.db_path cannot be empty"));
        }
        if self.cache_capacity_bytes == 0 {
            return Err(invalid("storage.cache_capacity_bytes must be positive"));
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./db/ballot_sync")
}
fn default_cache_capacity_bytes() -> u64 {
    64 * 1024 * 1024 //64MB
}
