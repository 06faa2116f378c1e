//! A candidate registered by student id resolves to the same handle on
//! every later lookup.

use ballot_sync::IdentityMapper;

use crate::common::World;
use crate::common::NOW;

#[tokio::test]
async fn registered_handle_resolves_consistently() {
    let world = World::new(NOW);
    let mapper = IdentityMapper::new(world.admin(), world.store.clone());

    for student_id in ["2021-0001", "2021-0002", "2022-1234"] {
        let registration = mapper.register_candidate(student_id).await.unwrap();
        assert!(registration.wrote_ledger());

        for _ in 0..3 {
            assert_eq!(
                mapper.resolve_candidate_handle(student_id).await.unwrap(),
                Some(registration.handle)
            );
        }
        assert_eq!(
            mapper.ensure_candidate_handle(student_id).await.unwrap().handle,
            registration.handle
        );
    }
    assert_eq!(world.ledger.write_count(), 3);
    assert_eq!(mapper.resolve_candidate_handle("2099-0000").await.unwrap(), None);
}
