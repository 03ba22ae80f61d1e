//! Database configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://data/stockroom.sqlite` or
    /// `sqlite::memory:`.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_url() -> String {
    "sqlite://data/stockroom.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Filesystem path of the database file, if the URL names one.
    pub fn file_path(&self) -> Option<&str> {
        let rest = self.url.strip_prefix("sqlite:")?;
        if rest.starts_with(":memory:") {
            return None;
        }
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let path = rest.split('?').next().unwrap_or(rest);
        (!path.is_empty()).then_some(path)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid(format!(
                "database.url must be a sqlite URL, got '{}'",
                self.url
            )));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_file_path() {
        assert_eq!(with_url("sqlite://data/app.db").file_path(), Some("data/app.db"));
        assert_eq!(with_url("sqlite:/var/lib/app.db").file_path(), Some("/var/lib/app.db"));
        assert_eq!(with_url("sqlite://app.db?mode=rwc").file_path(), Some("app.db"));
        assert_eq!(with_url("sqlite::memory:").file_path(), None);
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        assert!(with_url("postgres://localhost/db").validate().is_err());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let cfg = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
