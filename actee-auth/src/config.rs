// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Preview keys older than this are reaped.
pub const DEFAULT_PREVIEW_KEY_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Configuration of the authorization components.
///
/// Loading it from files or the environment is left to the application.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AuthConfig {
    /// How long a `preview_key` actor lives before `Lifecycle::reap_preview_keys` removes it.
    pub preview_key_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            preview_key_ttl: DEFAULT_PREVIEW_KEY_TTL,
        }
    }
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview_key_ttl(mut self, ttl: Duration) -> Self {
        self.preview_key_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::AuthConfig;

    #[test]
    fn defaults_to_one_day() {
        let config = AuthConfig::new();
        assert_eq!(config.preview_key_ttl, Duration::from_secs(86_400));

        let config = config.preview_key_ttl(Duration::from_secs(60));
        assert_eq!(config.preview_key_ttl, Duration::from_secs(60));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial_config() {
        let config: AuthConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AuthConfig::default());

        let config: AuthConfig =
            serde_json::from_str(r#"{"preview_key_ttl":{"secs":3600,"nanos":0}}"#).unwrap();
        assert_eq!(config.preview_key_ttl, Duration::from_secs(3600));
    }
}
