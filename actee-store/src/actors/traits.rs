// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{Actee, ActeeId, Actor, ActorId, ActorKind, Timestamp};

use crate::traits::Store;

/// Interface for storing, updating and querying actors.
///
/// Reads return soft-deleted (tombstoned) actors as well, it is the responsibility of the caller
/// to filter them out on every path where they could surface.
pub trait ActorStore: Store {
    /// Insert an actor.
    ///
    /// Returns `true` when the insert occurred, or `false` when an actor with the same id already
    /// existed and no insertion occurred.
    fn insert_actor(&self, actor: &Actor) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Get an actor by id.
    fn actor(&self, id: &ActorId) -> impl Future<Output = Result<Option<Actor>, Self::Error>>;

    /// Get the actor owning the given actee identity.
    fn actor_by_actee(
        &self,
        actee_id: &ActeeId,
    ) -> impl Future<Output = Result<Option<Actor>, Self::Error>>;

    /// Overwrite the mutable fields of an actor (display name, meta data and timestamps).
    ///
    /// The id, kind and actee id of an actor are never changed. Returns `false` when the actor
    /// was not found in the store.
    fn update_actor(&self, actor: &Actor) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Permanently delete an actor, together with its own actee, all grants held by it or
    /// targeting its actee and all memberships it is part of (as a member or as a group).
    ///
    /// Returns `true` when the removal occurred and `false` when the actor was not found.
    fn delete_actor(&self, id: &ActorId) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns all actors of the given kind, including soft-deleted ones.
    fn actors_of_kind(
        &self,
        kind: ActorKind,
    ) -> impl Future<Output = Result<Vec<Actor>, Self::Error>>;

    /// Permanently delete all actors of the given kind which were created strictly before the
    /// given timestamp, cascading like `delete_actor`. Returns the number of removed actors.
    fn delete_actors_created_before(
        &self,
        kind: ActorKind,
        before: Timestamp,
    ) -> impl Future<Output = Result<usize, Self::Error>>;
}

/// Interface for storing and querying grantable resource identities.
pub trait ActeeStore: Store {
    /// Insert an actee.
    ///
    /// Returns `false` when an actee with the same id already existed.
    fn insert_actee(&self, actee: &Actee) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Get an actee by id.
    fn actee(&self, id: &ActeeId) -> impl Future<Output = Result<Option<Actee>, Self::Error>>;
}
