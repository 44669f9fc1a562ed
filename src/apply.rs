//! Push orchestration
//!
//! One linear pass shared by the CLI and the end-to-end tests: fetch the
//! server's configuration, drop every pipeline group, rebuild the
//! topology against the same value, validate, and commit it in a single
//! save. There is no retry and no partial apply: an error before the
//! push leaves the server untouched, a version conflict surfaces as is.

use crate::client::{ConfigStore, ConfigStoreError, ConfigVersion};
use crate::core::validate::{validate, ValidationReport};
use crate::settings::CfCredentials;
use crate::topology;
use thiserror::Error;
use tracing::{debug, info};

/// Error types for a push run
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Store(#[from] ConfigStoreError),

    #[error("configuration failed validation:\n{0}")]
    Validation(ValidationReport),
}

/// What a successful push declared
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub groups: usize,
    pub pipelines: usize,
    pub version: ConfigVersion,
}

/// Replace the server's pipeline configuration with the built topology
pub async fn apply(
    store: &dyn ConfigStore,
    credentials: &CfCredentials,
) -> Result<ApplyOutcome, ApplyError> {
    let (mut config, version) = store.fetch().await?;
    debug!(
        "Fetched configuration version {} with {} pipeline group(s)",
        version,
        config.groups.len()
    );

    config.remove_all_pipeline_groups();
    let config = topology::build(config, credentials);

    let report = validate(&config);
    if !report.is_ok() {
        return Err(ApplyError::Validation(report));
    }

    let new_version = store.push(&config, &version).await?;
    info!(
        "Declared {} pipeline(s) across {} group(s), now at version {}",
        config.pipeline_count(),
        config.groups.len(),
        new_version
    );

    Ok(ApplyOutcome {
        groups: config.groups.len(),
        pipelines: config.pipeline_count(),
        version: new_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryConfigStore;

    #[tokio::test]
    async fn test_apply_validates_before_pushing() {
        let store = InMemoryConfigStore::new();
        let credentials = CfCredentials::new("cf-user", "cf-pass");

        let outcome = apply(&store, &credentials).await.unwrap();
        assert_eq!(outcome.groups, 5);
        assert_eq!(outcome.pipelines, 13);
    }
}
