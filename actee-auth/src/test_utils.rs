// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use actee_core::{Actee, Actor, ActorDraft, ActorKind, Grant, ManualClock, Role, VerbSet};
use actee_store::{ActeeStore, ActorStore, GrantStore, MembershipStore, RoleStore};

use crate::{Assignments, AuthConfig, Lifecycle, Memberships, Resolver};

/// Install a tracing subscriber when `RUST_LOG` is set, for example `RUST_LOG=actee_auth=trace`.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// All authorization components wired to one store and a manual clock.
pub struct TestSetup<S> {
    pub store: S,
    pub clock: ManualClock,
    pub resolver: Resolver<S>,
    pub assignments: Assignments<S>,
    pub memberships: Memberships<S>,
    pub lifecycle: Lifecycle<S, ManualClock>,
}

impl<S> TestSetup<S>
where
    S: ActorStore + ActeeStore + GrantStore + MembershipStore + RoleStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, AuthConfig::default())
    }

    pub fn with_config(store: S, config: AuthConfig) -> Self {
        let clock = ManualClock::new(1_000);
        Self {
            resolver: Resolver::new(store.clone()),
            assignments: Assignments::new(store.clone()),
            memberships: Memberships::new(store.clone()),
            lifecycle: Lifecycle::with_clock(store.clone(), clock.clone(), config),
            clock,
            store,
        }
    }

    /// Create and persist an actor of the given kind.
    pub async fn actor(&self, kind: ActorKind, display_name: &str) -> Actor {
        self.lifecycle
            .create(ActorDraft::new(kind, display_name))
            .await
            .expect("create actor")
    }

    /// Create and persist a user-defined role.
    pub async fn role(&self, name: &str, verbs: impl Into<VerbSet>) -> Role {
        let role = Role::new(name, verbs);
        self.store.insert_role(&role).await.expect("insert role");
        role
    }

    /// Create and persist a built-in role.
    pub async fn system_role(
        &self,
        name: &str,
        system_name: &str,
        verbs: impl Into<VerbSet>,
    ) -> Role {
        let role = Role::system(name, system_name, verbs);
        self.store.insert_role(&role).await.expect("insert role");
        role
    }

    /// Write a grant directly, skipping the escalation check of `Assignments`.
    pub async fn grant(&self, actor: &Actor, role: &Role, actee: &Actee) -> Grant {
        let grant = Grant::new(actor.id, role.id, actee.id.clone());
        self.store.insert_grant(&grant).await.expect("insert grant");
        grant
    }

    /// Make `member` a member of `group`.
    pub async fn join(&self, member: &Actor, group: &Actor) {
        self.memberships
            .add_member(member, group)
            .await
            .expect("add member");
    }

    /// Refresh an actor from the store, including tombstoned ones.
    pub async fn reload(&self, actor: &Actor) -> Actor {
        self.store
            .actor(&actor.id)
            .await
            .expect("read actor")
            .expect("actor exists")
    }
}
