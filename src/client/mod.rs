//! Config-store clients for the server's admin API

pub mod http;

use crate::core::CruiseConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use http::HttpConfigStore;

/// Error types for config-store operations
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("request error: {0}")]
    Request(String),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("configuration changed on the server since version {version} was fetched")]
    Conflict { version: String },

    #[error("failed to decode server response: {0}")]
    Decode(String),
}

/// Opaque version token for optimistic concurrency
///
/// Returned by a fetch and handed back on push; the server refuses the
/// push if the configuration moved on in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVersion(String);

impl ConfigVersion {
    pub fn new(token: impl Into<String>) -> Self {
        ConfigVersion(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for config stores - allows for different backends
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the current configuration and its version token
    async fn fetch(&self) -> Result<(CruiseConfig, ConfigVersion), ConfigStoreError>;

    /// Replace the configuration in one atomic call
    ///
    /// `version` must be the token from the preceding fetch.
    async fn push(
        &self,
        config: &CruiseConfig,
        version: &ConfigVersion,
    ) -> Result<ConfigVersion, ConfigStoreError>;
}

/// In-memory config store (for testing and dry runs)
pub struct InMemoryConfigStore {
    state: tokio::sync::RwLock<(CruiseConfig, u64)>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::with_config(CruiseConfig::default())
    }

    /// Seed the store with an existing configuration
    pub fn with_config(config: CruiseConfig) -> Self {
        Self {
            state: tokio::sync::RwLock::new((config, 0)),
        }
    }

    /// Snapshot of the currently stored configuration
    pub async fn current(&self) -> CruiseConfig {
        self.state.read().await.0.clone()
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn fetch(&self) -> Result<(CruiseConfig, ConfigVersion), ConfigStoreError> {
        let state = self.state.read().await;
        Ok((state.0.clone(), ConfigVersion::new(state.1.to_string())))
    }

    async fn push(
        &self,
        config: &CruiseConfig,
        version: &ConfigVersion,
    ) -> Result<ConfigVersion, ConfigStoreError> {
        let mut state = self.state.write().await;
        if version.as_str() != state.1.to_string() {
            return Err(ConfigStoreError::Conflict {
                version: version.as_str().to_string(),
            });
        }
        state.0 = config.clone();
        state.1 += 1;
        Ok(ConfigVersion::new(state.1.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_fetch_push_round_trip() {
        let store = InMemoryConfigStore::new();

        let (mut config, version) = store.fetch().await.unwrap();
        assert!(config.groups.is_empty());

        config.ensure_pipeline_group("catalog");
        let new_version = store.push(&config, &version).await.unwrap();
        assert_ne!(new_version, version);

        let (fetched, _) = store.fetch().await.unwrap();
        assert_eq!(fetched, config);
    }

    #[tokio::test]
    async fn test_in_memory_rejects_stale_version() {
        let store = InMemoryConfigStore::new();

        let (config, stale) = store.fetch().await.unwrap();
        store.push(&config, &stale).await.unwrap();

        let result = store.push(&config, &stale).await;
        assert!(matches!(result, Err(ConfigStoreError::Conflict { .. })));
    }
}
