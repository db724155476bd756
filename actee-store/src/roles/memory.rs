// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Role, RoleId};

use crate::memory::MemoryStore;
use crate::roles::RoleStore;

impl RoleStore for MemoryStore {
    async fn insert_role(&self, role: &Role) -> Result<bool, Self::Error> {
        let mut store = self.write_store();

        let system_name_taken = role.system_name.is_some()
            && store
                .roles
                .values()
                .any(|stored| stored.system_name == role.system_name);
        if store.roles.contains_key(&role.id) || system_name_taken {
            return Ok(false);
        }

        store.roles.insert(role.id, role.clone());
        Ok(true)
    }

    async fn role(&self, id: &RoleId) -> Result<Option<Role>, Self::Error> {
        Ok(self.read_store().roles.get(id).cloned())
    }

    async fn role_by_system_name(&self, system_name: &str) -> Result<Option<Role>, Self::Error> {
        Ok(self
            .read_store()
            .roles
            .values()
            .find(|role| role.system_name.as_deref() == Some(system_name))
            .cloned())
    }

    async fn delete_role(&self, id: &RoleId) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store.roles.remove(id).is_none() {
            return Ok(false);
        }
        store.grants.retain(|grant| grant.role_id != *id);
        Ok(true)
    }
}
