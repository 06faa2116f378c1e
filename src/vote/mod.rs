//! Single-voter vote submission against a deployed election.

mod vote_coordinator;

pub use vote_coordinator::*;
