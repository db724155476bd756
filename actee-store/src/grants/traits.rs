// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActorId, Grant, Role, ScopeChain};

use crate::traits::Store;

/// Interface for storing role grants and running scoped queries over them.
pub trait GrantStore: Store {
    /// Insert a grant.
    ///
    /// Returns `false` when the exact same (actor, role, actee) triple already existed.
    fn insert_grant(&self, grant: &Grant) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a grant matching the exact triple.
    ///
    /// Returns `false` when no grant matched.
    fn delete_grant(&self, grant: &Grant) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns all grants held directly by an actor.
    fn grants_for_actor(
        &self,
        actor_id: &ActorId,
    ) -> impl Future<Output = Result<Vec<Grant>, Self::Error>>;

    /// Returns all distinct roles granted to any of the given actors on any scope of the chain.
    ///
    /// This is the scoped range query every permission check boils down to. Grants pointing at a
    /// role which does not exist (anymore) are ignored.
    fn roles_in_scope(
        &self,
        actors: &[ActorId],
        scope: &ScopeChain,
    ) -> impl Future<Output = Result<Vec<Role>, Self::Error>>;
}
