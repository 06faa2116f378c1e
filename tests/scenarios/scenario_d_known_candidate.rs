//! Scenario D: a candidate whose student id is already registered on the
//! ledger, e.g. by an earlier election or another admin session.
//!
//! Expected Result:
//!
//! - Registration returns the existing handle as a success.
//! - Deployment reports the registration step as succeeded.

use ballot_sync::DeployStep;
use ballot_sync::ElectionStore;
use ballot_sync::HandleOrigin;
use ballot_sync::IdentityMapper;
use ballot_sync::LedgerGateway;

use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn duplicate_registration_returns_existing_handle() {
    let world = World::new(NOW);
    let existing = world
        .ledger
        .register_candidate("another-admin", "2021-0010")
        .await
        .unwrap();

    let mapper = IdentityMapper::new(world.admin(), world.store.clone());
    let registration = mapper.register_candidate("2021-0010").await.unwrap();

    assert_eq!(registration.handle, existing);
    assert_eq!(registration.origin, HandleOrigin::AlreadyRegistered);
    assert!(!registration.wrote_ledger());
}

#[tokio::test]
async fn deployment_adopts_existing_registration() {
    let world = World::new(NOW);
    let existing = world
        .ledger
        .register_candidate("another-admin", "2021-0010")
        .await
        .unwrap();
    world.seed_senate(1, NOW + 60, NOW + 3600, &[(10, "2021-0010")]).await;

    let report = world.reconciler().deploy(1).await.unwrap();

    assert!(report.is_complete(), "{}", report.summary());
    assert!(report
        .succeeded_for(DeployStep::RegisterCandidate { candidate_id: 10 })
        .is_some());
    assert_eq!(
        world.store.candidate(10).await.unwrap().unwrap().ledger_handle,
        Some(existing)
    );
}
