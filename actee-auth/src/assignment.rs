// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, Actor, ActorId, Grant, Role, RoleId, VerbSet};
use actee_store::{ActorStore, GrantStore, MembershipStore, RoleStore};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::resolver::Resolver;

/// Error types for role assignments.
#[derive(Debug, Error)]
pub enum AssignmentError<E> {
    /// The assigner tried to hand out verbs it does not hold itself.
    #[error("actor {assigner} can't assign role {role}, missing verbs {missing}")]
    Escalation {
        assigner: ActorId,
        role: RoleId,
        missing: VerbSet,
    },

    /// A well-known role is not configured. This is a deployment defect, not a user error.
    #[error("missing well-known role with system name '{0}'")]
    MissingSystemRow(String),

    #[error("expected role {0} to exist in the store")]
    UnknownRole(RoleId),

    #[error("actor {0} is deleted")]
    DeletedActor(ActorId),

    #[error("expected actor {0} to exist in the store")]
    UnknownActor(ActorId),

    #[error("store error: {0}")]
    Store(E),
}

/// Writes and removes grants while enforcing the non-escalation invariant.
///
/// No actor can assign a role carrying verbs it does not hold on the same target itself. The
/// check runs at assignment time only, grants are not re-validated when the assigner later
/// loses capabilities.
#[derive(Clone, Debug)]
pub struct Assignments<S> {
    store: S,
    resolver: Resolver<S>,
}

impl<S> Assignments<S>
where
    S: ActorStore + GrantStore + MembershipStore + RoleStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            resolver: Resolver::new(store.clone()),
            store,
        }
    }

    /// Grant `role` on `actee` to `grantee`, on behalf of `assigner`.
    ///
    /// Fails with [`AssignmentError::Escalation`] when the role carries verbs the assigner does
    /// not hold on the actee, nothing is written in that case. Granting the same triple again
    /// is not an error.
    pub async fn assign_role(
        &self,
        assigner: &Actor,
        grantee: &Actor,
        role: &Role,
        actee: &Actee,
    ) -> Result<Grant, AssignmentError<S::Error>> {
        self.ensure_live(&assigner.id).await?;
        self.ensure_live(&grantee.id).await?;
        let role = self.stored_role(&role.id).await?;
        self.ensure_covered(assigner, &role, actee).await?;

        let grant = Grant::new(grantee.id, role.id, actee.id.clone());
        self.insert_grant(&grant).await?;

        Ok(grant)
    }

    /// Remove the grant of `role` on `actee` from `grantee`, on behalf of `assigner`.
    ///
    /// The assigner needs to hold every verb of the role on the actee, the same as for
    /// assigning it. Returns `false` when no such grant existed.
    pub async fn unassign_role(
        &self,
        assigner: &Actor,
        grantee: &ActorId,
        role: &Role,
        actee: &Actee,
    ) -> Result<bool, AssignmentError<S::Error>> {
        self.ensure_live(&assigner.id).await?;
        let role = self.stored_role(&role.id).await?;
        self.ensure_covered(assigner, &role, actee).await?;

        self.delete_grant(&Grant::new(*grantee, role.id, actee.id.clone()))
            .await
    }

    /// Grant the well-known role with the given system name on `actee` to `actor`.
    ///
    /// This is the bootstrapping path for built-in roles and does not run the escalation check,
    /// callers are responsible for only invoking it from trusted flows.
    pub async fn assign_system_role(
        &self,
        system_name: &str,
        actee: &Actee,
        actor: &Actor,
    ) -> Result<Grant, AssignmentError<S::Error>> {
        self.ensure_live(&actor.id).await?;
        let role = self.system_role(system_name).await?;

        let grant = Grant::new(actor.id, role.id, actee.id.clone());
        self.insert_grant(&grant).await?;

        Ok(grant)
    }

    /// Remove the well-known role with the given system name on `actee` from `actor`.
    pub async fn unassign_system_role(
        &self,
        system_name: &str,
        actee: &Actee,
        actor: &ActorId,
    ) -> Result<bool, AssignmentError<S::Error>> {
        let role = self.system_role(system_name).await?;
        self.delete_grant(&Grant::new(*actor, role.id, actee.id.clone()))
            .await
    }

    async fn ensure_covered(
        &self,
        assigner: &Actor,
        role: &Role,
        actee: &Actee,
    ) -> Result<(), AssignmentError<S::Error>> {
        let missing = self
            .resolver
            .missing_verbs(assigner, role, actee)
            .await
            .map_err(AssignmentError::Store)?;

        if !missing.is_empty() {
            warn!(
                assigner = %assigner.id,
                role = %role.id,
                actee = %actee.id,
                %missing,
                "deny role assignment exceeding own capabilities"
            );
            return Err(AssignmentError::Escalation {
                assigner: assigner.id,
                role: role.id,
                missing,
            });
        }

        Ok(())
    }

    async fn ensure_live(&self, id: &ActorId) -> Result<(), AssignmentError<S::Error>> {
        match self.store.actor(id).await.map_err(AssignmentError::Store)? {
            None => Err(AssignmentError::UnknownActor(*id)),
            Some(actor) if actor.is_deleted() => Err(AssignmentError::DeletedActor(*id)),
            Some(_) => Ok(()),
        }
    }

    async fn stored_role(&self, id: &RoleId) -> Result<Role, AssignmentError<S::Error>> {
        self.store
            .role(id)
            .await
            .map_err(AssignmentError::Store)?
            .ok_or(AssignmentError::UnknownRole(*id))
    }

    async fn system_role(&self, system_name: &str) -> Result<Role, AssignmentError<S::Error>> {
        match self
            .store
            .role_by_system_name(system_name)
            .await
            .map_err(AssignmentError::Store)?
        {
            Some(role) => Ok(role),
            None => {
                error!(system_name, "well-known role is not configured");
                Err(AssignmentError::MissingSystemRow(system_name.to_string()))
            }
        }
    }

    async fn insert_grant(&self, grant: &Grant) -> Result<(), AssignmentError<S::Error>> {
        let inserted = self
            .store
            .insert_grant(grant)
            .await
            .map_err(AssignmentError::Store)?;

        if inserted {
            debug!(
                actor = %grant.actor_id,
                role = %grant.role_id,
                actee = %grant.actee_id,
                "granted role"
            );
        }

        Ok(())
    }

    async fn delete_grant(&self, grant: &Grant) -> Result<bool, AssignmentError<S::Error>> {
        let removed = self
            .store
            .delete_grant(grant)
            .await
            .map_err(AssignmentError::Store)?;

        if removed {
            debug!(
                actor = %grant.actor_id,
                role = %grant.role_id,
                actee = %grant.actee_id,
                "revoked role"
            );
        }

        Ok(removed)
    }
}
