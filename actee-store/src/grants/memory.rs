// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use actee_core::{ActorId, Grant, Role, ScopeChain};

use crate::grants::GrantStore;
use crate::memory::MemoryStore;

impl GrantStore for MemoryStore {
    async fn insert_grant(&self, grant: &Grant) -> Result<bool, Self::Error> {
        Ok(self.write_store().grants.insert(grant.clone()))
    }

    async fn delete_grant(&self, grant: &Grant) -> Result<bool, Self::Error> {
        Ok(self.write_store().grants.remove(grant))
    }

    async fn grants_for_actor(&self, actor_id: &ActorId) -> Result<Vec<Grant>, Self::Error> {
        Ok(self
            .read_store()
            .grants
            .iter()
            .filter(|grant| grant.actor_id == *actor_id)
            .cloned()
            .collect())
    }

    async fn roles_in_scope(
        &self,
        actors: &[ActorId],
        scope: &ScopeChain,
    ) -> Result<Vec<Role>, Self::Error> {
        let store = self.read_store();
        let roles: BTreeMap<_, _> = store
            .grants
            .iter()
            .filter(|grant| actors.contains(&grant.actor_id) && scope.contains(&grant.actee_id))
            .filter_map(|grant| store.roles.get(&grant.role_id))
            .map(|role| (role.id, role.clone()))
            .collect();
        Ok(roles.into_values().collect())
    }
}
