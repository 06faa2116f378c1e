use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;
use crate::TxPriority;

/// Resubmission after a congestion failure
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ResubmitPolicy {
    /// Automatic resubmissions (0 or 1, never an open loop)
    #[serde(default = "default_max_resubmissions")]
    pub max_resubmissions: u32,

    /// Priority increase requested on resubmission (unit: percent)
    #[serde(default = "default_priority_bump_percent")]
    pub priority_bump_percent: u32,
}

impl Default for ResubmitPolicy {
    fn default() -> Self {
        Self {
            max_resubmissions: default_max_resubmissions(),
            priority_bump_percent: default_priority_bump_percent(),
        }
    }
}

impl ResubmitPolicy {
    /// Priority hint for the resubmitted transaction.
    pub fn escalated_priority(&self) -> TxPriority {
        TxPriority::Escalated {
            bump_percent: self.priority_bump_percent,
        }
    }
}

/// Divide strategies by transaction kind
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RetryPolicies {
    // Vote submission (user-signed)
    #[serde(default)]
    pub vote: ResubmitPolicy,
}

impl RetryPolicies {
    pub fn validate(&self) -> Result<()> {
        if self.vote.max_resubmissions > 1 {
            return Err(invalid(format!(
                "retry.vote.max_resubmissions must be 0 or 1, got {}",
                self.vote.max_resubmissions
            )));
        }
        if self.vote.max_resubmissions == 1 && self.vote.priority_bump_percent == 0 {
            return Err(invalid(
                "retry.vote.priority_bump_percent must be positive when resubmission is enabled",
            ));
        }
        Ok(())
    }
}

fn default_max_resubmissions() -> u32 {
    1
}
fn default_priority_bump_percent() -> u32 {
    25
}
