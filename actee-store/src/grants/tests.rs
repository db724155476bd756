// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, ActeeId, ActorId, Grant, Role, VerbSet};

use crate::assert_all_stores;
use crate::grants::GrantStore;
use crate::roles::RoleStore;

#[tokio::test]
async fn insert_delete_grants() {
    assert_all_stores!(|store| async {
        let actor = ActorId::random();
        let role = Role::new("viewer", ["form.read"]);
        let grant = Grant::new(actor, role.id, ActeeId::new("form-1"));

        store.insert_role(&role).await.unwrap();

        assert!(store.insert_grant(&grant).await.unwrap());
        // Grants are unique per triple.
        assert!(!store.insert_grant(&grant).await.unwrap());

        assert_eq!(
            store.grants_for_actor(&actor).await.unwrap(),
            vec![grant.clone()]
        );
        assert!(
            store
                .grants_for_actor(&ActorId::random())
                .await
                .unwrap()
                .is_empty()
        );

        // Removal requires an exact match.
        let other_scope = Grant::new(actor, role.id, ActeeId::new("form-2"));
        assert!(!store.delete_grant(&other_scope).await.unwrap());
        assert!(store.delete_grant(&grant).await.unwrap());
        assert!(!store.delete_grant(&grant).await.unwrap());
        assert!(store.grants_for_actor(&actor).await.unwrap().is_empty());
    });
}

#[tokio::test]
async fn roles_in_scope_chain() {
    assert_all_stores!(|store| async {
        let user = ActorId::random();
        let group = ActorId::random();
        let outsider = ActorId::random();

        let viewer = Role::new("viewer", ["form.read"]);
        let editor = Role::new("editor", ["form.read", "form.update"]);
        let auditor = Role::new("auditor", ["audit.read"]);
        let nobody = Role::new("nobody", VerbSet::new());
        for role in [&viewer, &editor, &auditor, &nobody] {
            store.insert_role(role).await.unwrap();
        }

        let form_1 = Actee::new("form-1", "form");
        let form_2 = Actee::new("form-2", "form");

        // Type wildcard grant to the user, specific grant to the group, global grant to an
        // unrelated actor.
        for grant in [
            Grant::new(user, viewer.id, ActeeId::new("form")),
            Grant::new(user, nobody.id, ActeeId::new("form-1")),
            Grant::new(group, editor.id, ActeeId::new("form-1")),
            Grant::new(outsider, auditor.id, ActeeId::global()),
        ] {
            store.insert_grant(&grant).await.unwrap();
        }

        let mut expected = vec![viewer.clone(), editor.clone(), nobody.clone()];
        expected.sort_by_key(|role| role.id);
        assert_eq!(
            store
                .roles_in_scope(&[user, group], &form_1.scope_chain())
                .await
                .unwrap(),
            expected
        );

        // The group grant only applies to the specific form.
        assert_eq!(
            store
                .roles_in_scope(&[user, group], &form_2.scope_chain())
                .await
                .unwrap(),
            vec![viewer.clone()]
        );

        // Global grants apply to every actee.
        assert_eq!(
            store
                .roles_in_scope(&[outsider], &form_2.scope_chain())
                .await
                .unwrap(),
            vec![auditor.clone()]
        );

        // Roles granted on the same scope twice are returned once.
        store
            .insert_grant(&Grant::new(group, viewer.id, ActeeId::global()))
            .await
            .unwrap();
        assert_eq!(
            store
                .roles_in_scope(&[user, group], &form_2.scope_chain())
                .await
                .unwrap(),
            vec![viewer.clone()]
        );

        assert!(
            store
                .roles_in_scope(&[], &form_1.scope_chain())
                .await
                .unwrap()
                .is_empty()
        );
    });
}

#[tokio::test]
async fn grants_of_missing_roles_are_ignored() {
    assert_all_stores!(|store| async {
        let actor = ActorId::random();
        let role = Role::new("ghost", ["form.read"]);
        let form = Actee::new("form-1", "form");

        // The role was never stored.
        store
            .insert_grant(&Grant::new(actor, role.id, form.id.clone()))
            .await
            .unwrap();

        assert!(
            store
                .roles_in_scope(&[actor], &form.scope_chain())
                .await
                .unwrap()
                .is_empty()
        );
    });
}
