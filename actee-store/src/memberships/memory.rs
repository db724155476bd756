// SPDX-License-Identifier: MIT OR Apache-2.0

use actee_core::{ActorId, Membership};
use petgraph::Direction;

use crate::memberships::MembershipStore;
use crate::memory::MemoryStore;

impl MembershipStore for MemoryStore {
    async fn insert_membership(&self, membership: &Membership) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store
            .memberships
            .contains_edge(membership.member, membership.group)
        {
            return Ok(false);
        }
        store
            .memberships
            .add_edge(membership.member, membership.group, ());
        Ok(true)
    }

    async fn delete_membership(&self, membership: &Membership) -> Result<bool, Self::Error> {
        let removed = self
            .write_store()
            .memberships
            .remove_edge(membership.member, membership.group);
        Ok(removed.is_some())
    }

    async fn groups_of(&self, member: &ActorId) -> Result<Vec<ActorId>, Self::Error> {
        let store = self.read_store();
        if !store.memberships.contains_node(*member) {
            return Ok(Vec::new());
        }
        let mut groups: Vec<ActorId> = store
            .memberships
            .neighbors_directed(*member, Direction::Outgoing)
            .collect();
        groups.sort();
        Ok(groups)
    }

    async fn members_of(&self, group: &ActorId) -> Result<Vec<ActorId>, Self::Error> {
        let store = self.read_store();
        if !store.memberships.contains_node(*group) {
            return Ok(Vec::new());
        }
        let mut members: Vec<ActorId> = store
            .memberships
            .neighbors_directed(*group, Direction::Incoming)
            .collect();
        members.sort();
        Ok(members)
    }
}
