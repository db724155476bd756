// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::identity::{ActeeId, ActorId, RoleId};
use crate::verb::VerbSet;

/// Named bundle of verbs defining the maximum capability a grant of this role can confer.
///
/// Roles with a system name are built-in and resolvable by well-known lookup, all others are
/// user-defined. The verb set of a role is treated as immutable once the role is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub system_name: Option<String>,
    pub verbs: VerbSet,
}

impl Role {
    /// Create a new user-defined role.
    pub fn new(name: impl Into<String>, verbs: impl Into<VerbSet>) -> Self {
        Self {
            id: RoleId::random(),
            name: name.into(),
            system_name: None,
            verbs: verbs.into(),
        }
    }

    /// Create a new built-in role which can be looked up by its system name.
    pub fn system(
        name: impl Into<String>,
        system_name: impl Into<String>,
        verbs: impl Into<VerbSet>,
    ) -> Self {
        Self {
            system_name: Some(system_name.into()),
            ..Self::new(name, verbs)
        }
    }

    pub fn is_system(&self) -> bool {
        self.system_name.is_some()
    }
}

/// Records that an actor holds a role on an actee scope.
///
/// The scope can be a specific actee id, a type wildcard or the global wildcard `"*"`. Grants
/// are unique per triple.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub actor_id: ActorId,
    pub role_id: RoleId,
    pub actee_id: ActeeId,
}

impl Grant {
    pub fn new(actor_id: ActorId, role_id: RoleId, actee_id: ActeeId) -> Self {
        Self {
            actor_id,
            role_id,
            actee_id,
        }
    }
}
