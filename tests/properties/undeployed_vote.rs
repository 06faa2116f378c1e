//! Voting on an election without a ledger handle always fails with
//! `NotDeployed` and writes nothing, whatever its local dates say.

use ballot_sync::VoteError;

use crate::common::ballot;
use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn undeployed_election_refuses_votes_in_every_phase() {
    let windows = [
        (NOW + 3600, NOW + 7200),
        (NOW - 10, NOW + 3600),
        (NOW - 7200, NOW - 3600),
    ];

    for (id, (start, end)) in (1u64..).zip(windows) {
        let world = World::new(NOW);
        world.seed_senate(id, start, end, &[(10, "2021-0010")]).await;

        let result = world.voter("0xstudent1").vote(&ballot(id, 10, "student-1")).await;

        assert!(matches!(result, Err(VoteError::NotDeployed(e)) if e == id));
        assert_eq!(world.ledger.write_count(), 0);
        assert!(world.ledger.vote_priorities().is_empty());
    }
}
