use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Status-advance transactions per sync invocation: the first attempt
    /// plus at most one retry.
    #[serde(default = "default_max_advance_attempts")]
    pub max_advance_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_advance_attempts: default_max_advance_attempts(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.max_advance_attempts) {
            return Err(invalid(format!(
                "sync.max_advance_attempts must be 1 or 2, got {}",
                self.max_advance_attempts
            )));
        }
        Ok(())
    }
}

fn default_max_advance_attempts() -> u32 {
    2
}
