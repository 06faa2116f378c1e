//! Deploying the same election twice with no external change in between
//! performs zero ledger writes the second time and reports every roster
//! entry as succeeded.

use ballot_sync::DeployStep;
use ballot_sync::LedgerOp;
use ballot_sync::StepResolution;

use crate::common::World;
use crate::common::NOW;

const ROSTER: [(u64, &str); 3] = [(10, "2021-0010"), (11, "2021-0011"), (12, "2021-0012")];

#[tokio::test]
async fn second_deploy_is_write_free() {
    let world = World::new(NOW);
    world.seed_senate(1, NOW + 60, NOW + 3600, &ROSTER).await;

    let first = world.reconciler().deploy(1).await.unwrap();
    assert!(first.is_complete(), "{}", first.summary());
    assert_eq!(first.ledger_writes, 7);

    let writes = world.ledger.write_count();
    let second = world.reconciler().deploy(1).await.unwrap();

    assert_eq!(world.ledger.write_count(), writes);
    assert_eq!(second.ledger_writes, 0);
    assert!(second.is_complete());
    for (candidate_id, _) in ROSTER {
        let attach = second
            .succeeded_for(DeployStep::AttachCandidate { candidate_id })
            .unwrap();
        assert_eq!(attach.resolution, StepResolution::AlreadyPresent);
    }
}

#[tokio::test]
async fn interrupted_deploy_resumes_where_it_stopped() {
    let world = World::new(NOW);
    world.seed_senate(1, NOW + 60, NOW + 3600, &ROSTER).await;
    world
        .ledger
        .fail_next(LedgerOp::AttachCandidate, "Error: Transaction was not mined within 50 blocks");

    let first = world.reconciler().deploy(1).await.unwrap();
    assert_eq!(first.failed.len(), 1);
    assert_eq!(first.succeeded.len(), 6);

    let second = world.reconciler().deploy(1).await.unwrap();
    assert!(second.is_complete(), "{}", second.summary());
    assert_eq!(second.ledger_writes, 1);

    let third = world.reconciler().deploy(1).await.unwrap();
    assert_eq!(third.ledger_writes, 0);
}
