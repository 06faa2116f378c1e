use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Account that signs administrative transactions
    #[serde(default = "default_account")]
    pub account: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(invalid("ledger.account cannot be empty"));
        }
        Ok(())
    }
}

fn default_account() -> String {
    "election-admin".to_string()
}
