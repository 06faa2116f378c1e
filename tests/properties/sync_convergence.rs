//! A Pending election whose window is open converges to Active after one
//! sync, and an immediate second sync is a no-op.

use ballot_sync::LedgerGateway;
use ballot_sync::LedgerStatus;
use ballot_sync::PositionCategory;
use ballot_sync::SyncAction;

use crate::common::World;
use crate::common::ADMIN;
use crate::common::NOW;

#[tokio::test]
async fn open_window_converges_and_stays_converged() {
    for offset in [0u64, 1, 600, 3599] {
        let world = World::new(NOW);
        let handle = world
            .ledger
            .create_election(ADMIN, PositionCategory::Senator, NOW - offset, NOW + 3600)
            .await
            .unwrap();
        let synchronizer = world.synchronizer();

        let first = synchronizer.sync(handle).await.unwrap();
        assert_eq!(first.after, LedgerStatus::Active, "start offset {offset}");

        let writes = world.ledger.write_count();
        let second = synchronizer.sync(handle).await.unwrap();
        assert_eq!(second.action, SyncAction::NoChangeNeeded);
        assert_eq!(world.ledger.write_count(), writes);
    }
}

#[tokio::test]
async fn dashboard_sync_reports_every_election() {
    let world = World::new(NOW);
    let mut handles = Vec::new();
    for (start, end) in [(NOW - 10, NOW + 10), (NOW + 10, NOW + 20), (NOW - 20, NOW - 10)] {
        handles.push(
            world
                .ledger
                .create_election(ADMIN, PositionCategory::Senator, start, end)
                .await
                .unwrap(),
        );
    }

    let summary = world.synchronizer().sync_many(&handles).await;

    assert_eq!(summary.converged(), 3, "{}", summary.summary());
    assert!(summary.failures.is_empty());
}
