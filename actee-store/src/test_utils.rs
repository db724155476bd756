// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures and macros for testing store implementations.
use std::collections::BTreeMap;

use actee_core::{ActeeId, Actor, ActorId, ActorKind, Timestamp};

/// Macro to run the same test logic against all store backend implementations.
///
/// This macro takes a closure that will be executed against each store type:
/// - In-memory store (`MemoryStore`)
/// - SQLite store (`SqliteStore`), through a handle scoped to one transaction which is committed
///   afterwards
///
/// ## Example
///
/// ```rust
/// # use actee_core::Role;
/// # use actee_store::RoleStore;
/// # use actee_store::assert_all_stores;
/// # async fn run() {
/// assert_all_stores!(|store| async {
///     let role = Role::new("viewer", ["form.read"]);
///     assert!(store.insert_role(&role).await.unwrap());
///     assert_eq!(store.role(&role.id).await.unwrap(), Some(role));
/// });
/// # }
/// ```
#[macro_export]
macro_rules! assert_all_stores {
    (|$store:ident| $test_body:expr) => {
        // Test with MemoryStore.
        {
            let $store = $crate::memory::MemoryStore::new();
            $test_body.await;
        }

        // Test with SqliteStore.
        {
            let sqlite_store = $crate::sqlite::SqliteStoreBuilder::new()
                .random_memory_url()
                // We're running in a single test thread and can't have more parallel connections.
                .max_connections(1)
                .build()
                .await
                .unwrap();
            let permit = $crate::Transaction::begin(&sqlite_store).await.unwrap();
            let $store = sqlite_store.scoped(&permit);
            $test_body.await;
            $crate::Transaction::commit(&sqlite_store, permit)
                .await
                .unwrap();
        }
    };
}

/// Build an actor with random identifiers, it is not persisted anywhere.
pub fn test_actor(kind: ActorKind, created_at: Timestamp) -> Actor {
    Actor {
        id: ActorId::random(),
        kind,
        actee_id: ActeeId::random(),
        display_name: format!("test {kind}"),
        meta: BTreeMap::new(),
        created_at,
        updated_at: None,
        deleted_at: None,
    }
}
