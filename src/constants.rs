// -
// Eligibility

/// Stored faculty value meaning "every faculty may vote".
pub const ALL_FACULTIES_SENTINEL: &str = "all";

// -
// Sled tree namespaces

pub(crate) const ELECTIONS_TREE: &str = "_elections";
pub(crate) const CANDIDATES_TREE: &str = "_candidates";
pub(crate) const ROSTER_TREE: &str = "_election_candidates";
pub(crate) const VOTERS_TREE: &str = "_voters";

// -
// Config

pub(crate) const CONFIG_ENV_PREFIX: &str = "BALLOT";
pub(crate) const DEFAULT_CONFIG_FILE: &str = "config/ballot_sync";
