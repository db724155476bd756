// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, ActeeId, ActorId, ActorKind, Grant, Membership, Role};

use crate::actors::{ActeeStore, ActorStore};
use crate::assert_all_stores;
use crate::grants::GrantStore;
use crate::memberships::MembershipStore;
use crate::roles::RoleStore;
use crate::test_utils::test_actor;

#[tokio::test]
async fn insert_get_update_actors() {
    assert_all_stores!(|store| async {
        let mut actor = test_actor(ActorKind::User, 100);
        actor.meta.insert("locale".into(), "de".into());

        // Insert
        // ~~~~~~

        assert!(store.insert_actor(&actor).await.unwrap());
        // Re-inserting the same actor returns false.
        assert!(!store.insert_actor(&actor).await.unwrap());

        // Get
        // ~~~

        assert_eq!(store.actor(&actor.id).await.unwrap(), Some(actor.clone()));
        assert_eq!(
            store.actor_by_actee(&actor.actee_id).await.unwrap(),
            Some(actor.clone())
        );
        assert_eq!(store.actor(&ActorId::random()).await.unwrap(), None);
        assert_eq!(
            store.actor_by_actee(&ActeeId::random()).await.unwrap(),
            None
        );

        // Update
        // ~~~~~~

        let mut updated = actor.clone();
        updated.display_name = "Panda".into();
        updated.meta.clear();
        updated.meta.insert("theme".into(), "dark".into());
        updated.updated_at = Some(200);
        assert!(store.update_actor(&updated).await.unwrap());
        assert_eq!(store.actor(&actor.id).await.unwrap(), Some(updated.clone()));

        // Updating an unknown actor returns false.
        let unknown = test_actor(ActorKind::User, 100);
        assert!(!store.update_actor(&unknown).await.unwrap());

        // Tombstoned actors are still returned by the store.
        updated.deleted_at = Some(300);
        assert!(store.update_actor(&updated).await.unwrap());
        let tombstoned = store.actor(&actor.id).await.unwrap().unwrap();
        assert!(tombstoned.is_deleted());
    });
}

#[tokio::test]
async fn delete_actor_cascades() {
    assert_all_stores!(|store| async {
        let user = test_actor(ActorKind::User, 100);
        let group = test_actor(ActorKind::Group, 100);
        let role = Role::new("editor", ["form.update"]);
        let form = ActeeId::new("form-1");

        store.insert_actor(&user).await.unwrap();
        store.insert_actor(&group).await.unwrap();
        store.insert_role(&role).await.unwrap();
        store
            .insert_grant(&Grant::new(user.id, role.id, form.clone()))
            .await
            .unwrap();
        store
            .insert_membership(&Membership::new(user.id, group.id))
            .await
            .unwrap();

        // The group holds a role on the user's own actee.
        store.insert_actee(&user.actee()).await.unwrap();
        store
            .insert_grant(&Grant::new(group.id, role.id, user.actee_id.clone()))
            .await
            .unwrap();

        assert!(store.delete_actor(&user.id).await.unwrap());
        // Deleting twice returns false.
        assert!(!store.delete_actor(&user.id).await.unwrap());

        assert_eq!(store.actor(&user.id).await.unwrap(), None);
        assert!(store.grants_for_actor(&user.id).await.unwrap().is_empty());
        assert!(store.members_of(&group.id).await.unwrap().is_empty());
        assert_eq!(store.actee(&user.actee_id).await.unwrap(), None);
        assert!(store.grants_for_actor(&group.id).await.unwrap().is_empty());

        // The group itself is untouched.
        assert_eq!(store.actor(&group.id).await.unwrap(), Some(group.clone()));
    });
}

#[tokio::test]
async fn actors_of_kind_and_expiry() {
    assert_all_stores!(|store| async {
        let key_1 = test_actor(ActorKind::PreviewKey, 10);
        let key_2 = test_actor(ActorKind::PreviewKey, 20);
        let key_3 = test_actor(ActorKind::PreviewKey, 30);
        let user = test_actor(ActorKind::User, 10);

        for actor in [&key_1, &key_2, &key_3, &user] {
            store.insert_actor(actor).await.unwrap();
        }

        let keys = store.actors_of_kind(ActorKind::PreviewKey).await.unwrap();
        assert_eq!(keys, vec![key_1.clone(), key_2.clone(), key_3.clone()]);

        // Boundary is exclusive, the key created at 20 survives.
        let removed = store
            .delete_actors_created_before(ActorKind::PreviewKey, 20)
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let keys = store.actors_of_kind(ActorKind::PreviewKey).await.unwrap();
        assert_eq!(keys, vec![key_2.clone(), key_3.clone()]);

        // Other kinds are not affected, even when they are older.
        assert_eq!(store.actor(&user.id).await.unwrap(), Some(user.clone()));
    });
}

#[tokio::test]
async fn insert_get_actees() {
    assert_all_stores!(|store| async {
        let actee = Actee::new("form-1", "form");

        assert!(store.insert_actee(&actee).await.unwrap());
        assert!(!store.insert_actee(&actee).await.unwrap());

        assert_eq!(store.actee(&actee.id).await.unwrap(), Some(actee.clone()));
        assert_eq!(store.actee(&ActeeId::new("form-2")).await.unwrap(), None);
    });
}
