// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actee::Actee;
use crate::clock::Timestamp;
use crate::identity::{ActeeId, ActorId};

/// Closed set of actor types.
///
/// Adding a new kind is a schema change, the set is not meant to be extended at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Internal service actor.
    #[serde(rename = "system")]
    System,

    /// Human account.
    #[serde(rename = "user")]
    User,

    /// Collection of other actors which inherit everything granted to it.
    #[serde(rename = "group")]
    Group,

    /// Actor acting on behalf of another one, for example an API token.
    #[serde(rename = "proxy")]
    Proxy,

    /// Ephemeral actor backing a one-time action like a password reset link.
    #[serde(rename = "singleUse")]
    SingleUse,

    /// App-generated credential.
    #[serde(rename = "field_key")]
    FieldKey,

    /// Short-lived credential for previewing a resource, reaped periodically.
    #[serde(rename = "preview_key")]
    PreviewKey,
}

impl ActorKind {
    pub const ALL: [ActorKind; 7] = [
        ActorKind::System,
        ActorKind::User,
        ActorKind::Group,
        ActorKind::Proxy,
        ActorKind::SingleUse,
        ActorKind::FieldKey,
        ActorKind::PreviewKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::System => "system",
            ActorKind::User => "user",
            ActorKind::Group => "group",
            ActorKind::Proxy => "proxy",
            ActorKind::SingleUse => "singleUse",
            ActorKind::FieldKey => "field_key",
            ActorKind::PreviewKey => "preview_key",
        }
    }

    /// Type of the actee identity owned by actors of this kind.
    pub fn actee_type(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = ActorKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ActorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ActorKindError::Unknown(value.to_string()))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ActorKindError {
    #[error("unknown actor kind '{0}'")]
    Unknown(String),
}

/// An entity which can hold permissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,

    pub kind: ActorKind,

    /// Id of the actee identity owned by this actor. Never changes after creation.
    pub actee_id: ActeeId,

    pub display_name: String,

    /// Opaque key/value data attached by the application.
    pub meta: BTreeMap<String, String>,

    pub created_at: Timestamp,

    pub updated_at: Option<Timestamp>,

    /// Tombstone. Deleted actors are excluded from every permission check but their rows and
    /// grants are kept.
    pub deleted_at: Option<Timestamp>,
}

impl Actor {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The actee identity representing this actor as the target of a grant.
    pub fn actee(&self) -> Actee {
        Actee::new(self.actee_id.clone(), self.kind.actee_type())
    }
}

/// Caller-provided fields of an actor which is about to be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorDraft {
    pub kind: ActorKind,
    pub display_name: String,
    pub meta: BTreeMap<String, String>,
}

impl ActorDraft {
    pub fn new(kind: ActorKind, display_name: impl Into<String>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Externally writable fields of an actor. Everything else is managed by the system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorPatch {
    pub display_name: Option<String>,
}

impl ActorPatch {
    pub fn display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
        }
    }
}

/// Directed membership edge: `member` inherits everything granted to `group`.
///
/// Membership is not ownership, removing a group does not remove its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub member: ActorId,
    pub group: ActorId,
}

impl Membership {
    pub fn new(member: ActorId, group: ActorId) -> Self {
        Self { member, group }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ActorKind, ActorKindError};

    #[test]
    fn kind_string_representation() {
        for kind in ActorKind::ALL {
            assert_eq!(ActorKind::from_str(kind.as_str()), Ok(kind));
        }

        assert_eq!(ActorKind::SingleUse.to_string(), "singleUse");
        assert_eq!(ActorKind::FieldKey.to_string(), "field_key");
        assert_eq!(
            ActorKind::from_str("robot"),
            Err(ActorKindError::Unknown("robot".into()))
        );
    }

    #[test]
    fn kind_serde_matches_display() {
        for kind in ActorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
