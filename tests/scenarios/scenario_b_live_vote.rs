//! Scenario B: a live election whose ledger status lags the wall clock.
//!
//! 1. Deploy a senate election that opened ten seconds ago.
//! 2. Sync its status once.
//! 3. An eligible student votes.
//!
//! Expected Result:
//!
//! - The ledger status becomes Active.
//! - The vote is recorded on the ledger and locally.

use ballot_sync::ElectionStore;
use ballot_sync::LedgerGateway;
use ballot_sync::LedgerStatus;
use ballot_sync::SyncAction;
use ballot_sync::VoteOutcome;

use crate::common::ballot;
use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn synced_election_accepts_a_vote() {
    let world = World::new(NOW);
    world
        .seed_senate(1, NOW - 10, NOW + 3600, &[(10, "2021-0010"), (11, "2021-0011")])
        .await;
    let handle = world.reconciler().deploy(1).await.unwrap().election_handle.unwrap();
    assert_eq!(
        world.ledger.election_details(handle).await.unwrap().status,
        LedgerStatus::Pending
    );

    let outcome = world.synchronizer().sync(handle).await.unwrap();
    assert_eq!(outcome.action, SyncAction::Advanced { attempts: 1 });
    assert_eq!(outcome.after, LedgerStatus::Active);

    let submission = world.voter("0xstudent1").vote(&ballot(1, 11, "student-1")).await.unwrap();

    assert!(matches!(submission.outcome, VoteOutcome::Recorded { .. }));
    assert!(world.store.has_voted(1, "student-1").await.unwrap());
    let c11 = world.store.candidate(11).await.unwrap().unwrap().ledger_handle.unwrap();
    assert_eq!(world.ledger.candidate_votes(handle, c11).await.unwrap(), 1);
    assert_eq!(
        world.ledger.election_details(handle).await.unwrap().total_votes_cast,
        1
    );
}

#[tokio::test]
async fn vote_heals_a_stale_pending_status_itself() {
    let world = World::new(NOW);
    world.seed_senate(1, NOW - 10, NOW + 3600, &[(10, "2021-0010")]).await;
    let handle = world.reconciler().deploy(1).await.unwrap().election_handle.unwrap();

    let submission = world.voter("0xstudent1").vote(&ballot(1, 10, "student-1")).await.unwrap();

    assert!(matches!(submission.outcome, VoteOutcome::Recorded { .. }));
    assert_eq!(
        world.ledger.election_details(handle).await.unwrap().status,
        LedgerStatus::Active
    );
}
