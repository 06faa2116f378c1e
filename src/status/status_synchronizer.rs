use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Clock;
use crate::ElectionHandle;
use crate::ElectionId;
use crate::ElectionStore;
use crate::Error;
use crate::LedgerContext;
use crate::LedgerElection;
use crate::LedgerErrorKind;
use crate::LedgerGateway;
use crate::LedgerStatus;
use crate::Result;
use crate::StorageError;
use crate::SyncConfig;
use crate::LEDGER_WRITES;
use crate::STATUS_ADVANCES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Ledger status already matched the wall clock, or every advance
    /// reverted as a no-op.
    NoChangeNeeded,
    /// Advance transactions were submitted; `attempts` of them.
    Advanced { attempts: u32 },
    /// The signer declined the advance transaction.
    Cancelled,
    /// The ledger is ahead of the wall clock or cancelled; nothing this
    /// component may submit fixes it.
    NotCorrectable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub handle: ElectionHandle,
    pub before: LedgerStatus,
    pub expected: LedgerStatus,
    pub after: LedgerStatus,
    pub action: SyncAction,
    pub warning: Option<String>,
}

impl SyncOutcome {
    pub fn converged(&self) -> bool {
        self.after == self.expected
    }
}

/// Aggregate of a dashboard-wide sync.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub outcomes: Vec<SyncOutcome>,
    pub failures: Vec<(ElectionHandle, String)>,
}

impl SyncSummary {
    pub fn converged(&self) -> usize {
        self.outcomes.iter().filter(|o| o.converged()).count()
    }

    pub fn diverged(&self) -> usize {
        self.outcomes.len() - self.converged()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} converged, {} diverged, {} failed",
            self.converged(),
            self.diverged(),
            self.failures.len()
        );
        for (handle, reason) in &self.failures {
            summary.push_str(&format!("\n  {handle}: {reason}"));
        }
        summary
    }
}

/// Corrects a ledger election status that lags behind the wall clock.
///
/// The ledger never changes status on its own, so whoever notices a stale
/// status (an admin dashboard or a voter) triggers this check.
pub struct StatusSynchronizer<L, S> {
    ctx: LedgerContext<L>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
}

impl<L, S> StatusSynchronizer<L, S>
where
    L: LedgerGateway,
    S: ElectionStore,
{
    pub fn new(
        ctx: LedgerContext<L>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> Self {
        Self {
            ctx,
            store,
            clock,
            config,
        }
    }

    /// Syncs the ledger copy of a local election.
    pub async fn sync_election(
        &self,
        election_id: ElectionId,
    ) -> Result<SyncOutcome> {
        let election = self.store.election(election_id).await?.ok_or(StorageError::NotFound {
            entity: "election",
            id: election_id,
        })?;
        let handle = election.ledger_handle.ok_or(Error::NotDeployed(election_id))?;
        self.sync(handle).await
    }

    pub async fn sync(
        &self,
        handle: ElectionHandle,
    ) -> Result<SyncOutcome> {
        let gateway = self.ctx.gateway();
        let details = gateway.election_details(handle).await?;
        let expected = details.implied_status(self.clock.now_secs());
        let before = details.status;

        let mut outcome = SyncOutcome {
            handle,
            before,
            expected,
            after: before,
            action: SyncAction::NoChangeNeeded,
            warning: None,
        };

        if before == expected {
            debug!("{} status {} matches wall clock", handle, before);
            return Ok(outcome);
        }

        if !Self::is_behind(&details, expected) {
            let warning = format!("{handle} reports {before} but the wall clock implies {expected}; not correctable");
            warn!("{}", warning);
            outcome.action = SyncAction::NotCorrectable;
            outcome.warning = Some(warning);
            return Ok(outcome);
        }

        let mut attempts = 0;
        let mut applied = 0;
        let mut current = details;
        while attempts < self.config.max_advance_attempts {
            attempts += 1;

            match gateway.advance_election_status(self.ctx.account(), handle).await {
                Ok(()) => {
                    applied += 1;
                    STATUS_ADVANCES.inc();
                    LEDGER_WRITES.with_label_values(&["updateElectionStatus"]).inc();
                }
                Err(e) if e.kind() == LedgerErrorKind::StatusUnchanged => {
                    debug!("{} advance was a no-op: {}", handle, e);
                }
                Err(e) if e.kind() == LedgerErrorKind::UserRejected => {
                    info!("{} status advance declined by signer", handle);
                    outcome.action = SyncAction::Cancelled;
                    return Ok(outcome);
                }
                Err(e) => return Err(e.into()),
            }

            current = gateway.election_details(handle).await?;
            outcome.expected = current.implied_status(self.clock.now_secs());
            outcome.after = current.status;
            outcome.action = SyncAction::Advanced { attempts };

            if outcome.converged() || !Self::is_behind(&current, outcome.expected) {
                break;
            }
        }

        // Every advance reverted as a no-op: another writer got there first.
        if applied == 0 && outcome.converged() {
            outcome.action = SyncAction::NoChangeNeeded;
        }

        if !outcome.converged() {
            let warning = format!(
                "{} still reports {} after {} advance attempt(s); wall clock implies {}",
                handle, current.status, attempts, outcome.expected
            );
            warn!("{}", warning);
            outcome.warning = Some(warning);
        } else {
            info!("{} status {} -> {}", handle, before, outcome.after);
        }
        Ok(outcome)
    }

    /// Syncs several elections; one failure does not stop the rest.
    pub async fn sync_many(
        &self,
        handles: &[ElectionHandle],
    ) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for handle in handles {
            match self.sync(*handle).await {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(e) => {
                    warn!("sync of {} failed: {}", handle, e);
                    summary.failures.push((*handle, e.to_string()));
                }
            }
        }
        summary
    }

    /// Only a lagging forward lifecycle can be fixed by an advance.
    fn is_behind(
        details: &LedgerElection,
        expected: LedgerStatus,
    ) -> bool {
        match (details.status.rank(), expected.rank()) {
            (Some(current), Some(target)) => current < target,
            _ => false,
        }
    }
}
