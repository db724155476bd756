// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability-based authorization over actors, roles and scoped grants.
//!
//! Every decision answers one question: may a _subject_ actor perform a _verb_ on a _target_
//! actee? The answer is computed from three sources:
//!
//! 1. Self-access: every actor may read and update its own record and end its own session, no
//!    grant is needed for that (see [`self_access_verbs`]).
//! 2. Grants: an actor holds a role on a scope of the target. Scopes form a chain of the
//!    specific actee id, the actee type and the global wildcard `"*"`, a grant on any of them
//!    applies.
//! 3. Memberships: an actor inherits everything granted to the groups it is a (transitive)
//!    member of.
//!
//! Soft-deleted actors are excluded from every path: they can't be subjects and tombstoned
//! groups pass nothing on to their members.
//!
//! The [`Resolver`] answers queries, [`Assignments`] writes grants while enforcing that no
//! assigner can hand out more than it holds itself, [`Memberships`] maintains the acyclic
//! membership graph and [`Lifecycle`] creates, updates and retires actors.
//!
//! All components are generic over the store interfaces of `actee-store` and do not cache any
//! state, every check is a point-in-time read against the store.
mod assignment;
mod config;
pub mod graph;
mod lifecycle;
mod membership;
mod resolver;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use assignment::{AssignmentError, Assignments};
pub use config::AuthConfig;
pub use lifecycle::{Lifecycle, LifecycleError};
pub use membership::{MembershipError, Memberships};
pub use resolver::{Resolver, SESSION_END, USER_READ, USER_UPDATE, self_access_verbs};
