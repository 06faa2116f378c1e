use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::DefinitionError;

/// Source of wall-clock time for status decisions.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> SystemTime;

    /// Current time as whole unix seconds.
    fn now_secs(&self) -> u64 {
        self.now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn at_secs(secs: u64) -> Self {
        Self {
            millis: AtomicU64::new(secs * 1000),
        }
    }

    pub fn set_secs(
        &self,
        secs: u64,
    ) {
        self.millis.store(secs * 1000, Ordering::SeqCst);
    }

    pub fn advance(
        &self,
        by: Duration,
    ) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Whole seconds since the unix epoch. Sub-second precision is truncated,
/// never rounded.
pub fn unix_seconds(instant: SystemTime) -> Result<u64, DefinitionError> {
    instant
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| DefinitionError::PreEpochInstant)
}

/// Inverse of [`unix_seconds`].
pub fn from_unix_seconds(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}
