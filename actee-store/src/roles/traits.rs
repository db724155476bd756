// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Role, RoleId};

use crate::traits::Store;

/// Interface for storing and querying roles.
///
/// Roles are immutable once inserted, there is no way to change the verb set of an existing role.
pub trait RoleStore: Store {
    /// Insert a role with its verbs.
    ///
    /// Returns `false` when a role with the same id or the same system name already existed and
    /// no insertion occurred.
    fn insert_role(&self, role: &Role) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Get a role by id.
    fn role(&self, id: &RoleId) -> impl Future<Output = Result<Option<Role>, Self::Error>>;

    /// Get a built-in role by its stable system name.
    fn role_by_system_name(
        &self,
        system_name: &str,
    ) -> impl Future<Output = Result<Option<Role>, Self::Error>>;

    /// Delete a role together with all grants of it.
    fn delete_role(&self, id: &RoleId) -> impl Future<Output = Result<bool, Self::Error>>;
}
