//! Local election graph and the ledger-side view of it.

mod candidate;
mod election;
mod ledger_types;

pub use candidate::*;
pub use election::*;
pub use ledger_types::*;
