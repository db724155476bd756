// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActorId, Membership};

use crate::assert_all_stores;
use crate::memberships::MembershipStore;

#[tokio::test]
async fn insert_query_delete_memberships() {
    assert_all_stores!(|store| async {
        let user = ActorId::random();
        let group_a = ActorId::random();
        let group_b = ActorId::random();

        assert!(
            store
                .insert_membership(&Membership::new(user, group_a))
                .await
                .unwrap()
        );
        assert!(
            store
                .insert_membership(&Membership::new(user, group_b))
                .await
                .unwrap()
        );
        assert!(
            store
                .insert_membership(&Membership::new(group_a, group_b))
                .await
                .unwrap()
        );
        // Re-inserting the same edge returns false.
        assert!(
            !store
                .insert_membership(&Membership::new(user, group_a))
                .await
                .unwrap()
        );

        // Only direct parents are returned.
        let mut expected = vec![group_a, group_b];
        expected.sort();
        assert_eq!(store.groups_of(&user).await.unwrap(), expected);
        assert_eq!(store.groups_of(&group_a).await.unwrap(), vec![group_b]);
        assert!(store.groups_of(&group_b).await.unwrap().is_empty());

        let mut expected = vec![user, group_a];
        expected.sort();
        assert_eq!(store.members_of(&group_b).await.unwrap(), expected);
        assert!(store.members_of(&user).await.unwrap().is_empty());
        assert!(
            store
                .members_of(&ActorId::random())
                .await
                .unwrap()
                .is_empty()
        );

        assert!(
            store
                .delete_membership(&Membership::new(user, group_a))
                .await
                .unwrap()
        );
        assert!(
            !store
                .delete_membership(&Membership::new(user, group_a))
                .await
                .unwrap()
        );
        assert_eq!(store.groups_of(&user).await.unwrap(), vec![group_b]);
    });
}
