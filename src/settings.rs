//! Server settings and platform credentials

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings file looked for in the working directory when `--settings`
/// is not given
pub const DEFAULT_SETTINGS_FILE: &str = "cruiser.yaml";

/// Error types for settings loading
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Top-level settings loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
}

/// Where and how to reach the CI server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the server
    #[serde(default = "default_url")]
    pub url: String,

    /// HTTP basic auth username (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP basic auth password (optional)
    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:8153".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve settings for a run
    ///
    /// An explicit path must exist; without one, the default file is used
    /// if present, otherwise built-in defaults apply.
    pub fn load(path: Option<&str>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Self::from_file(DEFAULT_SETTINGS_FILE)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Platform deployment credentials, injected as secure pipeline variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfCredentials {
    pub username: String,
    pub password: String,
}

impl CfCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read CF_USERNAME / CF_PASSWORD from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        let username =
            std::env::var("CF_USERNAME").map_err(|_| SettingsError::MissingEnv("CF_USERNAME"))?;
        let password =
            std::env::var("CF_PASSWORD").map_err(|_| SettingsError::MissingEnv("CF_PASSWORD"))?;
        Ok(Self { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.url, "http://localhost:8153");
        assert_eq!(settings.server.timeout_secs, 30);
        assert!(settings.server.username.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "server:\n  url: https://ci.example.com\n  username: admin\n  password: badger\n"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.server.url, "https://ci.example.com");
        assert_eq!(settings.server.username.as_deref(), Some("admin"));
        // Unset fields fall back to serde defaults
        assert_eq!(settings.server.timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load(Some("does-not-exist.yaml"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "server: [not, a, mapping]").unwrap();

        let result = Settings::from_file(file.path());
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
