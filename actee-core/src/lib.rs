// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data types for hierarchical, capability-based access control.
//!
//! Every [`Actor`] (a user, a group, an app credential, ..) owns exactly one [`Actee`] identity,
//! which makes actors both the _subject_ and the _target_ of permissions. Permissions are
//! expressed as [`Verb`]s bundled into [`Role`]s, and a [`Grant`] records that an actor holds a
//! role on an actee scope.
//!
//! Grants are matched against the [`ScopeChain`] of an actee: a grant recorded on the specific
//! actee id, on the actee type or on the global wildcard `"*"` all apply to the actee.
pub mod actee;
pub mod actor;
pub mod clock;
pub mod identity;
pub mod role;
pub mod verb;

pub use actee::{Actee, ScopeChain};
pub use actor::{Actor, ActorDraft, ActorKind, ActorKindError, ActorPatch, Membership};
#[cfg(any(test, feature = "test_utils"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock, Timestamp, current_timestamp};
pub use identity::{ActeeId, ActorId, IdentityError, RoleId};
pub use role::{Grant, Role};
pub use verb::{Verb, VerbSet};
