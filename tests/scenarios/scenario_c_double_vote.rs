//! Scenario C: the same voter tries to vote twice in one election.
//!
//! Expected Result:
//!
//! - The second attempt fails with `AlreadyVoted` before any ledger call.

use ballot_sync::VoteError;

use crate::common::ballot;
use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn second_vote_short_circuits_locally() {
    let world = World::new(NOW);
    world
        .seed_senate(1, NOW - 10, NOW + 3600, &[(10, "2021-0010"), (11, "2021-0011")])
        .await;
    world.reconciler().deploy(1).await.unwrap();
    let voter = world.voter("0xstudent1");
    voter.vote(&ballot(1, 10, "student-1")).await.unwrap();

    let writes = world.ledger.write_count();
    let submissions = world.ledger.vote_priorities().len();

    let result = voter.vote(&ballot(1, 11, "student-1")).await;

    assert!(matches!(result, Err(VoteError::AlreadyVoted(1))));
    assert_eq!(world.ledger.write_count(), writes);
    assert_eq!(world.ledger.vote_priorities().len(), submissions);
}

#[tokio::test]
async fn other_voters_are_not_affected() {
    let world = World::new(NOW);
    world.seed_senate(1, NOW - 10, NOW + 3600, &[(10, "2021-0010")]).await;
    world.reconciler().deploy(1).await.unwrap();

    world.voter("0xstudent1").vote(&ballot(1, 10, "student-1")).await.unwrap();
    let second = world.voter("0xstudent2").vote(&ballot(1, 10, "student-2")).await;

    assert!(second.is_ok());
}
