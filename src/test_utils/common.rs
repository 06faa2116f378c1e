use std::sync::Arc;

use crate::InMemoryLedger;
use crate::LedgerContext;
use crate::ManualClock;
use crate::MemoryElectionStore;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

/// Clock, ledger and store wired together the way the components expect.
pub struct TestHarness {
    pub clock: Arc<ManualClock>,
    pub ledger: Arc<InMemoryLedger>,
    pub ctx: LedgerContext<InMemoryLedger>,
    pub store: Arc<MemoryElectionStore>,
}

pub fn harness(now_secs: u64) -> TestHarness {
    enable_logger();
    let clock = Arc::new(ManualClock::at_secs(now_secs));
    let ledger = Arc::new(InMemoryLedger::new(clock.clone()));
    TestHarness {
        ctx: LedgerContext::new(ledger.clone(), "election-admin"),
        clock,
        ledger,
        store: Arc::new(MemoryElectionStore::new()),
    }
}
