//! # ballot-sync
//!
//! Keeps a university election system's local records and an external
//! vote-recording ledger in agreement.
//!
//! ## What this crate provides
//!
//! - **Identity mapping** - local election/candidate ids to ledger handles,
//!   keyed by student id
//! - **Deployment** - idempotent, resumable publication of an election and
//!   its roster to the ledger
//! - **Status sync** - correction of a ledger status that lags the wall clock
//! - **Vote submission** - one voter's ballot from eligibility checks to a
//!   classified ledger outcome
//!
//! The ledger is reached through [`LedgerGateway`]; [`InMemoryLedger`] is a
//! drop-in implementation for tests and local runs.
//!
//! ## Quick Start
//!
//! ```ignore
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//! let config = BallotSyncConfig::new()?.validate()?;
//! let ctx = LedgerContext::new(Arc::new(InMemoryLedger::new(clock.clone())), &config.ledger.account);
//! let store = Arc::new(SledElectionStore::open(&config.storage)?);
//!
//! let report = DeploymentReconciler::new(ctx, store, InFlightRegistry::new())
//!     .deploy(election_id)
//!     .await?;
//! println!("{}", report.summary());
//! ```

mod config;
mod constants;
mod errors;
mod identity;
mod ledger;
mod metrics;
mod model;
mod reconcile;
mod status;
mod storage;
mod vote;
pub mod utils;

pub use config::*;
pub use constants::*;
pub use errors::*;
pub use identity::*;
pub use ledger::*;
pub use metrics::*;
pub use model::*;
pub use reconcile::*;
pub use status::*;
pub use storage::*;
pub use utils::*;
pub use vote::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
