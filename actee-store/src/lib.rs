// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces and implementations of persistence layers for actors, actees, roles, grants and
//! memberships.
//!
//! The authorization engine only ever talks to the store through the traits in this crate, it
//! does not keep any grant state in memory. Every permission check is a point-in-time read
//! against the store.
//!
//! ## Read queries and writes
//!
//! All interfaces are split by concern (`ActorStore`, `RoleStore`, `GrantStore`, ..) and share
//! one error type through the [`Store`] trait, this allows higher-level components to require
//! exactly the interfaces they need while still handling one error type.
//!
//! Multiple writes which need to strictly _all_ occur or _none_ occur should be grouped into one
//! atomic transaction. Stores supporting this implement the [`Transaction`] trait. The SQLite
//! store requires writes to go through a handle scoped to an open transaction, reads can happen
//! with or without one and only see uncommitted changes of their own transaction.
//!
//! ## Store implementations
//!
//! An in-memory store is provided in the form of a `MemoryStore`, gated by the `memory` feature
//! flag. A SQLite store is provided in the form of a `SqliteStore`, gated by the `sqlite` feature
//! flag. Both are enabled by default.
pub mod actors;
pub mod grants;
#[cfg(feature = "memory")]
pub mod memory;
pub mod memberships;
pub mod roles;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod traits;

pub use actors::{ActeeStore, ActorStore};
pub use grants::GrantStore;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use memberships::MembershipStore;
pub use roles::RoleStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder, TransactionPermit};
pub use traits::{Store, Transaction};
