// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traversal of the membership graph.
//!
//! Edges point from a member to the group it belongs to. Traversals are a series of independent
//! store reads, the graph may change between them. Every node is visited at most once so the
//! traversal terminates even on cyclic data which slipped past the write-time check.
use std::collections::{HashSet, VecDeque};

use actee_core::ActorId;
use actee_store::{ActorStore, MembershipStore};
use tracing::trace;

/// Return all live groups the given actor transitively belongs to, not including the actor
/// itself.
///
/// Tombstoned (or unknown) groups contribute nothing and are not traversed through, their own
/// parents are only reached when another live path leads to them.
pub async fn ancestors_of<S>(store: &S, actor: &ActorId) -> Result<HashSet<ActorId>, S::Error>
where
    S: ActorStore + MembershipStore,
{
    traverse(store, actor, true).await
}

/// Return every group reachable from the given actor, including tombstoned ones.
///
/// Used to validate new edges: a cycle through a deleted group is still a cycle.
pub async fn reachable_groups<S>(store: &S, actor: &ActorId) -> Result<HashSet<ActorId>, S::Error>
where
    S: ActorStore + MembershipStore,
{
    traverse(store, actor, false).await
}

/// Return `true` if a path of membership edges leads from `from` to `to`.
pub async fn has_path<S>(store: &S, from: &ActorId, to: &ActorId) -> Result<bool, S::Error>
where
    S: ActorStore + MembershipStore,
{
    Ok(reachable_groups(store, from).await?.contains(to))
}

async fn traverse<S>(
    store: &S,
    actor: &ActorId,
    live_only: bool,
) -> Result<HashSet<ActorId>, S::Error>
where
    S: ActorStore + MembershipStore,
{
    let mut visited = HashSet::from([*actor]);
    let mut ancestors = HashSet::new();
    let mut queue = VecDeque::from([*actor]);

    while let Some(current) = queue.pop_front() {
        for group in store.groups_of(&current).await? {
            if !visited.insert(group) {
                continue;
            }

            if live_only {
                let stored = store.actor(&group).await?;
                let live = stored.is_some_and(|stored| !stored.is_deleted());
                if !live {
                    trace!(%group, member = %current, "skip deleted group in membership closure");
                    continue;
                }
            }

            ancestors.insert(group);
            queue.push_back(group);
        }
    }

    trace!(%actor, count = ancestors.len(), "resolved membership closure");
    Ok(ancestors)
}
