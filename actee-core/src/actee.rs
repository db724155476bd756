// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::identity::ActeeId;

/// A grantable resource identity.
///
/// Actees are the _object_ of a grant. An actee may represent an actor (every actor owns one) or
/// any other resource like a form or project.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actee {
    pub id: ActeeId,

    /// Type of the resource, for example `"form"` or `"user"`. The type doubles as the type
    /// wildcard scope in the scope chain.
    pub kind: String,
}

impl Actee {
    pub fn new(id: impl Into<ActeeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    /// Scope chain used to match grants against this actee.
    pub fn scope_chain(&self) -> ScopeChain {
        ScopeChain::new(self)
    }
}

/// Ordered list of identifiers a grant can be recorded against to apply to an actee:
/// `[specific id, type wildcard, global wildcard "*"]`.
///
/// Duplicates are collapsed, so the chain of the type wildcard actee `form` is `["form", "*"]`
/// and the chain of the global actee is `["*"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeChain(Vec<ActeeId>);

impl ScopeChain {
    pub fn new(actee: &Actee) -> Self {
        let mut scopes = Vec::with_capacity(3);
        for scope in [
            actee.id.clone(),
            ActeeId::new(actee.kind.clone()),
            ActeeId::global(),
        ] {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        Self(scopes)
    }

    pub fn contains(&self, actee_id: &ActeeId) -> bool {
        self.0.contains(actee_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActeeId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ActeeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScopeChain {
    type Item = &'a ActeeId;
    type IntoIter = std::slice::Iter<'a, ActeeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
