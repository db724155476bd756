// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence for actors, roles, grants and memberships.
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use actee_core::{Actee, ActeeId, Actor, ActorId, Grant, Role, RoleId};
use petgraph::prelude::DiGraphMap;

use crate::traits::Store;

/// Tables of the in-memory store.
#[derive(Clone, Debug, Default)]
pub struct InnerMemoryStore {
    pub(crate) actors: HashMap<ActorId, Actor>,
    pub(crate) actees: HashMap<ActeeId, Actee>,
    pub(crate) roles: HashMap<RoleId, Role>,
    pub(crate) grants: BTreeSet<Grant>,

    /// Membership graph, edges point from a member to the group it belongs to.
    pub(crate) memberships: DiGraphMap<ActorId, ()>,
}

/// In-memory store.
///
/// This does not persist data permamently, all changes are lost when the process ends. Use this
/// only in development or test contexts.
///
/// `MemoryStore` supports usage in asynchronous and multi-threaded contexts by wrapping an
/// `InnerMemoryStore` with an `RwLock` and `Arc`. Every clone shares the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a read-lock on the store.
    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub(crate) fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }
}

impl Store for MemoryStore {
    type Error = Infallible;
}

// Trait implementations are in the regarding modules, see for example `actors` or `grants` etc.
