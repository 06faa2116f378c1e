//! Scenario A: an upcoming election is deployed and synced before it opens.
//!
//! 1. Store a senate election starting in one hour.
//! 2. Deploy it.
//! 3. Sync its status.
//!
//! Expected Result:
//!
//! - Deployment succeeds and the ledger reports Pending.
//! - Sync leaves the status at Pending without submitting anything.

use ballot_sync::ElectionStore;
use ballot_sync::LedgerGateway;
use ballot_sync::LedgerStatus;
use ballot_sync::LocalStatus;
use ballot_sync::SyncAction;

use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn upcoming_election_is_not_advanced_early() {
    let world = World::new(NOW);
    world
        .seed_senate(1, NOW + 3600, NOW + 7200, &[(10, "2021-0010"), (11, "2021-0011")])
        .await;

    let report = world.reconciler().deploy(1).await.unwrap();
    assert!(report.is_complete(), "{}", report.summary());
    let handle = report.election_handle.unwrap();
    assert_eq!(
        world.ledger.election_details(handle).await.unwrap().status,
        LedgerStatus::Pending
    );

    let writes = world.ledger.write_count();
    let outcome = world.synchronizer().sync_election(1).await.unwrap();

    assert_eq!(outcome.action, SyncAction::NoChangeNeeded);
    assert_eq!(outcome.after, LedgerStatus::Pending);
    assert_eq!(world.ledger.write_count(), writes);

    let election = world.store.election(1).await.unwrap().unwrap();
    assert_eq!(
        election.local_status(ballot_sync::from_unix_seconds(NOW)),
        LocalStatus::Upcoming
    );
}
