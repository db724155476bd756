// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActorId, Membership};

use crate::traits::Store;

/// Interface for storing directed member-to-group edges.
///
/// The store does not check for cycles, callers are expected to validate edges before inserting
/// them.
pub trait MembershipStore: Store {
    /// Insert a membership edge.
    ///
    /// Returns `false` when the edge already existed.
    fn insert_membership(
        &self,
        membership: &Membership,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a membership edge. Returns `false` when no such edge existed.
    fn delete_membership(
        &self,
        membership: &Membership,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns the groups the given actor is a direct member of.
    fn groups_of(
        &self,
        member: &ActorId,
    ) -> impl Future<Output = Result<Vec<ActorId>, Self::Error>>;

    /// Returns the direct members of a group.
    fn members_of(
        &self,
        group: &ActorId,
    ) -> impl Future<Output = Result<Vec<ActorId>, Self::Error>>;
}
