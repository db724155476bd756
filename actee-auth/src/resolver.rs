// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, Actor, ActorId, ActorKind, Role, VerbSet};
use actee_store::{ActorStore, GrantStore, MembershipStore};
use tracing::{debug, trace};

use crate::graph::ancestors_of;

/// Read your own actor record.
pub const USER_READ: &str = "user.read";

/// Update your own actor record.
pub const USER_UPDATE: &str = "user.update";

/// Terminate your own session.
pub const SESSION_END: &str = "session.end";

/// Verbs an actor of the given kind holds on its own actee without any grant.
///
/// App-generated credentials (`field_key`) may not end their own session, everyone else may.
pub fn self_access_verbs(kind: ActorKind) -> VerbSet {
    match kind {
        ActorKind::FieldKey => VerbSet::from([USER_READ, USER_UPDATE]),
        ActorKind::System
        | ActorKind::User
        | ActorKind::Group
        | ActorKind::Proxy
        | ActorKind::SingleUse
        | ActorKind::PreviewKey => VerbSet::from([USER_READ, USER_UPDATE, SESSION_END]),
    }
}

/// Computes the effective capabilities of actors on actees.
///
/// The resolver keeps no state besides the store handle, every query reads the current grants
/// and memberships. Lookups of unknown subjects or targets are not errors, they resolve to no
/// verbs. Only store failures are returned as errors.
#[derive(Clone, Debug)]
pub struct Resolver<S> {
    store: S,
}

impl<S> Resolver<S>
where
    S: ActorStore + GrantStore + MembershipStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the union of the verbs of every role granted to the subject, or to any group in
    /// its membership closure, on any scope of the target.
    ///
    /// Unknown and tombstoned subjects hold nothing.
    pub async fn verbs_on(&self, subject: &ActorId, target: &Actee) -> Result<VerbSet, S::Error> {
        let Some(actor) = self.store.actor(subject).await? else {
            trace!(%subject, "unknown subject holds no verbs");
            return Ok(VerbSet::new());
        };

        if actor.is_deleted() {
            trace!(%subject, "deleted subject holds no verbs");
            return Ok(VerbSet::new());
        }

        let mut actors = vec![actor.id];
        actors.extend(ancestors_of(&self.store, &actor.id).await?);

        let roles = self
            .store
            .roles_in_scope(&actors, &target.scope_chain())
            .await?;

        let verbs = roles.iter().fold(VerbSet::new(), |mut verbs, role| {
            verbs.extend_from(&role.verbs);
            verbs
        });

        trace!(
            %subject,
            target = %target.id,
            roles = roles.len(),
            %verbs,
            "resolved verbs"
        );

        Ok(verbs)
    }

    /// Returns `true` if the subject may perform the verb on the target.
    ///
    /// A tombstoned subject is always denied. An actor acting on its own actee holds the
    /// self-access verbs of its kind without consulting any grants, all other verbs go through
    /// [`Resolver::verbs_on`].
    ///
    /// The tombstone is checked against the stored actor, so a copy of `subject` taken before
    /// its deletion is denied as well.
    pub async fn can(&self, subject: &Actor, verb: &str, target: &Actee) -> Result<bool, S::Error> {
        if subject.is_deleted() {
            debug!(subject = %subject.id, verb, "deny deleted subject");
            return Ok(false);
        }

        if subject.actee_id == target.id && self_access_verbs(subject.kind).contains(verb) {
            let live = self
                .store
                .actor(&subject.id)
                .await?
                .is_some_and(|stored| !stored.is_deleted());
            debug!(subject = %subject.id, verb, allowed = live, "checked self access");
            return Ok(live);
        }

        let allowed = self.verbs_on(&subject.id, target).await?.contains(verb);
        debug!(
            subject = %subject.id,
            verb,
            target = %target.id,
            allowed,
            "checked capability"
        );

        Ok(allowed)
    }

    /// Returns the verbs of the role the assigner does not hold on the target itself.
    ///
    /// An empty set means the assigner may hand out the role without escalating privileges.
    pub async fn missing_verbs(
        &self,
        assigner: &Actor,
        role: &Role,
        target: &Actee,
    ) -> Result<VerbSet, S::Error> {
        if assigner.is_deleted() {
            return Ok(role.verbs.clone());
        }

        let held = self.verbs_on(&assigner.id, target).await?;
        Ok(role.verbs.missing_from(&held))
    }

    /// Returns `true` if every verb of the role is held by the assigner on the target.
    pub async fn can_assign_role(
        &self,
        assigner: &Actor,
        role: &Role,
        target: &Actee,
    ) -> Result<bool, S::Error> {
        Ok(self.missing_verbs(assigner, role, target).await?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use actee_core::{ActorKind, VerbSet};

    use super::{SESSION_END, USER_READ, USER_UPDATE, self_access_verbs};

    #[test]
    fn self_access_per_kind() {
        for kind in ActorKind::ALL {
            let verbs = self_access_verbs(kind);
            assert!(verbs.contains(USER_READ));
            assert!(verbs.contains(USER_UPDATE));

            if kind == ActorKind::FieldKey {
                assert!(!verbs.contains(SESSION_END));
            } else {
                assert!(verbs.contains(SESSION_END));
            }
        }

        assert_eq!(
            self_access_verbs(ActorKind::FieldKey),
            VerbSet::from(["user.read", "user.update"])
        );
    }
}
