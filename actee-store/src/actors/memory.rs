// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, ActeeId, Actor, ActorId, ActorKind, Timestamp};
use tracing::trace;

use crate::actors::{ActeeStore, ActorStore};
use crate::memory::{InnerMemoryStore, MemoryStore};

impl InnerMemoryStore {
    /// Remove an actor and everything hanging off it.
    fn remove_actor(&mut self, id: &ActorId) -> bool {
        let Some(actor) = self.actors.remove(id) else {
            return false;
        };
        self.actees.remove(&actor.actee_id);
        self.grants
            .retain(|grant| grant.actor_id != *id && grant.actee_id != actor.actee_id);
        self.memberships.remove_node(*id);
        trace!(actor = %id, "removed actor with its actee, grants and memberships");
        true
    }
}

impl ActorStore for MemoryStore {
    async fn insert_actor(&self, actor: &Actor) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store.actors.contains_key(&actor.id) {
            return Ok(false);
        }
        store.actors.insert(actor.id, actor.clone());
        Ok(true)
    }

    async fn actor(&self, id: &ActorId) -> Result<Option<Actor>, Self::Error> {
        Ok(self.read_store().actors.get(id).cloned())
    }

    async fn actor_by_actee(&self, actee_id: &ActeeId) -> Result<Option<Actor>, Self::Error> {
        Ok(self
            .read_store()
            .actors
            .values()
            .find(|actor| &actor.actee_id == actee_id)
            .cloned())
    }

    async fn update_actor(&self, actor: &Actor) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        let Some(stored) = store.actors.get_mut(&actor.id) else {
            return Ok(false);
        };
        stored.display_name = actor.display_name.clone();
        stored.meta = actor.meta.clone();
        stored.updated_at = actor.updated_at;
        stored.deleted_at = actor.deleted_at;
        Ok(true)
    }

    async fn delete_actor(&self, id: &ActorId) -> Result<bool, Self::Error> {
        Ok(self.write_store().remove_actor(id))
    }

    async fn actors_of_kind(&self, kind: ActorKind) -> Result<Vec<Actor>, Self::Error> {
        let store = self.read_store();
        let mut actors: Vec<Actor> = store
            .actors
            .values()
            .filter(|actor| actor.kind == kind)
            .cloned()
            .collect();
        actors.sort_by_key(|actor| (actor.created_at, actor.id));
        Ok(actors)
    }

    async fn delete_actors_created_before(
        &self,
        kind: ActorKind,
        before: Timestamp,
    ) -> Result<usize, Self::Error> {
        let mut store = self.write_store();
        let expired: Vec<ActorId> = store
            .actors
            .values()
            .filter(|actor| actor.kind == kind && actor.created_at < before)
            .map(|actor| actor.id)
            .collect();
        for id in &expired {
            store.remove_actor(id);
        }
        Ok(expired.len())
    }
}

impl ActeeStore for MemoryStore {
    async fn insert_actee(&self, actee: &Actee) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store.actees.contains_key(&actee.id) {
            return Ok(false);
        }
        store.actees.insert(actee.id.clone(), actee.clone());
        Ok(true)
    }

    async fn actee(&self, id: &ActeeId) -> Result<Option<Actee>, Self::Error> {
        Ok(self.read_store().actees.get(id).cloned())
    }
}
