// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers for actors, roles and actees.
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// String of the global wildcard scope, matching every actee.
pub const GLOBAL_WILDCARD: &str = "*";

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new, random (UUID v4) identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Underlying UUID of this identifier.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = IdentityError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(value)?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0.hyphenated().to_string()).finish()
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier of an actor.
    ActorId
);

uuid_identifier!(
    /// Unique identifier of a role.
    RoleId
);

/// Identifier of a grantable resource.
///
/// Actee ids come in three flavours which together form the scope chain of an actee: the
/// specific id of a resource (actors use a random UUID string), the name of an actee type (for
/// example `"form"`) acting as a type wildcard, and the global wildcard `"*"`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActeeId(String);

impl ActeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a new, random actee id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// The global wildcard scope `"*"`.
    pub fn global() -> Self {
        Self(GLOBAL_WILDCARD.to_string())
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_WILDCARD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActeeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActeeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActeeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ActeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActeeId").field(&self.0).finish()
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid uuid identifier: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
