// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{
    ActeeId, Actor, ActorDraft, ActorId, ActorKind, ActorPatch, Clock, SystemClock,
};
use actee_store::{ActeeStore, ActorStore};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AuthConfig;

/// Error types for actor lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError<E> {
    #[error("expected actor {0} to exist in the store")]
    NotFound(ActorId),

    #[error("actor {0} is deleted")]
    Deleted(ActorId),

    #[error("store error: {0}")]
    Store(E),
}

/// Creates, updates and retires actors.
///
/// Ordinary flows never hard-delete an actor, they set a tombstone instead. The two exceptions
/// are consumed `singleUse` actors and expired `preview_key` actors.
#[derive(Clone, Debug)]
pub struct Lifecycle<S, C = SystemClock> {
    store: S,
    clock: C,
    config: AuthConfig,
}

impl<S> Lifecycle<S, SystemClock>
where
    S: ActorStore + ActeeStore,
{
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S, C> Lifecycle<S, C>
where
    S: ActorStore + ActeeStore,
    C: Clock,
{
    pub fn with_clock(store: S, clock: C, config: AuthConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Persist a new actor together with the actee identity it owns.
    pub async fn create(&self, draft: ActorDraft) -> Result<Actor, LifecycleError<S::Error>> {
        let actor = Actor {
            id: ActorId::random(),
            kind: draft.kind,
            actee_id: ActeeId::random(),
            display_name: draft.display_name,
            meta: draft.meta,
            created_at: self.clock.now(),
            updated_at: None,
            deleted_at: None,
        };

        self.store
            .insert_actee(&actor.actee())
            .await
            .map_err(LifecycleError::Store)?;
        self.store
            .insert_actor(&actor)
            .await
            .map_err(LifecycleError::Store)?;

        debug!(id = %actor.id, kind = %actor.kind, "created actor");
        Ok(actor)
    }

    /// Returns the actor if it exists and is not deleted.
    pub async fn get(&self, id: &ActorId) -> Result<Option<Actor>, LifecycleError<S::Error>> {
        let actor = self.store.actor(id).await.map_err(LifecycleError::Store)?;
        Ok(actor.filter(|actor| !actor.is_deleted()))
    }

    /// Apply the externally writable fields of the patch and restamp `updated_at`.
    pub async fn update(
        &self,
        actor: &Actor,
        patch: ActorPatch,
    ) -> Result<Actor, LifecycleError<S::Error>> {
        let mut stored = self.stored(&actor.id).await?;
        if stored.is_deleted() {
            return Err(LifecycleError::Deleted(stored.id));
        }

        if let Some(display_name) = patch.display_name {
            stored.display_name = display_name;
        }
        stored.updated_at = Some(self.clock.now());

        self.write(&stored).await?;
        debug!(id = %stored.id, "updated actor");

        Ok(stored)
    }

    /// Tombstone the actor. Its grants and memberships stay in place but are ignored from now on.
    ///
    /// Deleting an already deleted actor keeps the first deletion timestamp.
    pub async fn soft_delete(&self, actor: &Actor) -> Result<Actor, LifecycleError<S::Error>> {
        let mut stored = self.stored(&actor.id).await?;
        if stored.is_deleted() {
            return Ok(stored);
        }

        stored.deleted_at = Some(self.clock.now());
        self.write(&stored).await?;
        debug!(id = %stored.id, "soft-deleted actor");

        Ok(stored)
    }

    /// Hard-delete a `singleUse` actor after its one permitted action was validated.
    ///
    /// Returns `false` and leaves the actor untouched for every other kind.
    pub async fn consume(&self, actor: &Actor) -> Result<bool, LifecycleError<S::Error>> {
        if actor.kind != ActorKind::SingleUse {
            return Ok(false);
        }

        let removed = self
            .store
            .delete_actor(&actor.id)
            .await
            .map_err(LifecycleError::Store)?;
        if removed {
            debug!(id = %actor.id, "consumed single-use actor");
        }

        Ok(removed)
    }

    /// Remove all `preview_key` actors created before the configured time-to-live.
    ///
    /// Meant to run on a periodic schedule, not on the request path.
    pub async fn reap_preview_keys(&self) -> Result<usize, LifecycleError<S::Error>> {
        let horizon = self
            .clock
            .now()
            .saturating_sub(self.config.preview_key_ttl.as_secs());

        let removed = self
            .store
            .delete_actors_created_before(ActorKind::PreviewKey, horizon)
            .await
            .map_err(LifecycleError::Store)?;

        if removed > 0 {
            info!(removed, horizon, "reaped expired preview keys");
        }

        Ok(removed)
    }

    async fn stored(&self, id: &ActorId) -> Result<Actor, LifecycleError<S::Error>> {
        self.store
            .actor(id)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or(LifecycleError::NotFound(*id))
    }

    async fn write(&self, actor: &Actor) -> Result<(), LifecycleError<S::Error>> {
        let updated = self
            .store
            .update_actor(actor)
            .await
            .map_err(LifecycleError::Store)?;

        // The row vanished between reading and writing it.
        if !updated {
            return Err(LifecycleError::NotFound(actor.id));
        }

        Ok(())
    }
}
