use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;

lazy_static! {
    pub static ref LEDGER_WRITES: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_writes_total", "Ledger transactions submitted successfully"),
        &["operation"]
    )
    .expect("metric can not be created");

    pub static ref RECONCILE_STEP_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("reconcile_step_failures_total", "Deployment steps that failed"),
        &["step", "kind"]
    )
    .expect("metric can not be created");

    pub static ref VOTE_OUTCOMES: IntCounterVec = IntCounterVec::new(
        Opts::new("vote_outcomes_total", "Vote attempts by terminal outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref STATUS_ADVANCES: IntCounter = IntCounter::new(
        "status_advances_total",
        "Status-advance transactions submitted"
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry
            .register(Box::new(LEDGER_WRITES.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(RECONCILE_STEP_FAILURES.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(VOTE_OUTCOMES.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(STATUS_ADVANCES.clone()))
            .expect("collector can be registered");
        registry
    };
}

/// Renders every registered metric in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
