// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use actee_core::{Actor, ActorId, Membership};
use actee_store::{ActorStore, MembershipStore};
use thiserror::Error;
use tracing::debug;

use crate::graph::{ancestors_of, reachable_groups};

/// Error types for membership changes.
#[derive(Debug, Error)]
pub enum MembershipError<E> {
    #[error("actor {0} can't become a member of itself")]
    SelfMembership(ActorId),

    #[error("adding {member} to group {group} would create a membership cycle")]
    Cycle { member: ActorId, group: ActorId },

    #[error("actor {0} is deleted")]
    DeletedActor(ActorId),

    #[error("expected actor {0} to exist in the store")]
    UnknownActor(ActorId),

    #[error("store error: {0}")]
    Store(E),
}

/// Maintains the membership graph and keeps it acyclic.
#[derive(Clone, Debug)]
pub struct Memberships<S> {
    store: S,
}

impl<S> Memberships<S>
where
    S: ActorStore + MembershipStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Make `member` inherit everything granted to `group`.
    ///
    /// Both actors need to exist and be live. Edges which would close a cycle are rejected.
    /// Returns `false` if the member already belonged to the group.
    pub async fn add_member(
        &self,
        member: &Actor,
        group: &Actor,
    ) -> Result<bool, MembershipError<S::Error>> {
        if member.id == group.id {
            return Err(MembershipError::SelfMembership(member.id));
        }

        self.ensure_live(&member.id).await?;
        self.ensure_live(&group.id).await?;

        let upstream = reachable_groups(&self.store, &group.id)
            .await
            .map_err(MembershipError::Store)?;
        if upstream.contains(&member.id) {
            return Err(MembershipError::Cycle {
                member: member.id,
                group: group.id,
            });
        }

        let inserted = self
            .store
            .insert_membership(&Membership::new(member.id, group.id))
            .await
            .map_err(MembershipError::Store)?;

        if inserted {
            debug!(member = %member.id, group = %group.id, "added member to group");
        }

        Ok(inserted)
    }

    /// Remove a membership edge. Returns `false` if there was none.
    pub async fn remove_member(
        &self,
        member: &ActorId,
        group: &ActorId,
    ) -> Result<bool, MembershipError<S::Error>> {
        let removed = self
            .store
            .delete_membership(&Membership::new(*member, *group))
            .await
            .map_err(MembershipError::Store)?;

        if removed {
            debug!(%member, %group, "removed member from group");
        }

        Ok(removed)
    }

    /// All live groups the actor transitively belongs to.
    pub async fn ancestors(&self, actor: &ActorId) -> Result<HashSet<ActorId>, S::Error> {
        ancestors_of(&self.store, actor).await
    }

    async fn ensure_live(&self, id: &ActorId) -> Result<(), MembershipError<S::Error>> {
        match self.store.actor(id).await.map_err(MembershipError::Store)? {
            None => Err(MembershipError::UnknownActor(*id)),
            Some(actor) if actor.is_deleted() => Err(MembershipError::DeletedActor(*id)),
            Some(_) => Ok(()),
        }
    }
}
