//! Configuration for the election synchronization subsystem.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Optional `config/ballot_sync.toml`
//! - Configuration file named by `CONFIG_PATH`
//! - Environment variable overrides (`BALLOT__SECTION__KEY`)
mod ledger;
mod retry;
mod storage;
mod sync;
pub use ledger::*;
pub use retry::*;
pub use storage::*;
pub use sync::*;
#[cfg(test)]
mod config_test;
use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;
use crate::CONFIG_ENV_PREFIX;
use crate::DEFAULT_CONFIG_FILE;

/// Main configuration container
///
/// Sources are merged in this order (later sources override earlier):
/// 1. Default values from code implementation
/// 2. `config/ballot_sync.toml`, if present
/// 3. Configuration file specified by `CONFIG_PATH`
/// 4. Environment variables (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BallotSyncConfig {
    /// Ledger connection and signing account
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Status convergence parameters
    #[serde(default)]
    pub sync: SyncConfig,
    /// Local sled database
    #[serde(default)]
    pub storage: StorageConfig,
    /// Resubmission policies for ledger writes
    #[serde(default)]
    pub retry: RetryPolicies,
}

impl BallotSyncConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers should call `validate()` once all overrides are applied.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("BALLOT__LEDGER__ACCOUNT", "0xadmin");
    /// let cfg = BallotSyncConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.ledger.validate()?;
        self.sync.validate()?;
        self.storage.validate()?;
        self.retry.validate()?;
        Ok(self)
    }
}

pub(super) fn invalid(message: impl Into<String>) -> Error {
    Error::Config(ConfigError::Message(message.into()))
}
