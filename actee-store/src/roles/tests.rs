// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActeeId, ActorId, Grant, Role, RoleId, VerbSet};

use crate::assert_all_stores;
use crate::grants::GrantStore;
use crate::roles::RoleStore;

#[tokio::test]
async fn insert_get_roles() {
    assert_all_stores!(|store| async {
        let viewer = Role::new("viewer", ["form.read", "submission.list"]);
        let admin = Role::system("Administrator", "admin", ["form.read", "form.delete"]);

        assert!(store.insert_role(&viewer).await.unwrap());
        assert!(store.insert_role(&admin).await.unwrap());
        assert!(!store.insert_role(&viewer).await.unwrap());

        assert_eq!(store.role(&viewer.id).await.unwrap(), Some(viewer.clone()));
        assert_eq!(store.role(&RoleId::random()).await.unwrap(), None);

        assert_eq!(
            store.role_by_system_name("admin").await.unwrap(),
            Some(admin.clone())
        );
        assert_eq!(store.role_by_system_name("viewer").await.unwrap(), None);

        // System names are unique.
        let duplicate = Role::system("Other admin", "admin", ["form.read"]);
        assert!(!store.insert_role(&duplicate).await.unwrap());
        assert_eq!(store.role(&duplicate.id).await.unwrap(), None);
    });
}

#[tokio::test]
async fn role_without_verbs() {
    assert_all_stores!(|store| async {
        let empty = Role::new("nobody", VerbSet::new());
        assert!(store.insert_role(&empty).await.unwrap());

        let stored = store.role(&empty.id).await.unwrap().unwrap();
        assert!(stored.verbs.is_empty());
    });
}

#[tokio::test]
async fn delete_role_cascades_grants() {
    assert_all_stores!(|store| async {
        let role = Role::new("editor", ["form.update"]);
        let actor = ActorId::random();

        store.insert_role(&role).await.unwrap();
        store
            .insert_grant(&Grant::new(actor, role.id, ActeeId::new("form-1")))
            .await
            .unwrap();

        assert!(store.delete_role(&role.id).await.unwrap());
        assert!(!store.delete_role(&role.id).await.unwrap());

        assert_eq!(store.role(&role.id).await.unwrap(), None);
        assert!(store.grants_for_actor(&actor).await.unwrap().is_empty());
    });
}
