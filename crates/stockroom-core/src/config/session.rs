//! Session configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Where session records live.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process-local map. Lost on restart.
    #[default]
    Memory,
    /// The `sessions` table of the application database.
    Database,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Max-Age hint sent with the session cookie.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

fn default_cookie_name() -> String {
    "stockroom_session".to_string()
}

fn default_max_age_secs() -> u64 {
    24 * 60 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

impl SessionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let name = self.cookie_name.as_str();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid(format!(
                "session.cookie_name '{}' must be non-empty and use only [A-Za-z0-9_-]",
                name
            )));
        }
        if self.max_age_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.max_age_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
