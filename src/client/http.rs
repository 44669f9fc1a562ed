//! HTTP config store - talks to the server's admin config API
//!
//! Fetches the full configuration with `GET /go/api/admin/config`
//! (version token in the `ETag` header) and replaces it with a single
//! `PUT` carrying `If-Match`. A 412 means somebody changed the
//! configuration between fetch and push.

use crate::client::{ConfigStore, ConfigStoreError, ConfigVersion};
use crate::core::CruiseConfig;
use crate::settings::ServerSettings;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const CONFIG_PATH: &str = "/go/api/admin/config";

/// Client for the server's admin config endpoint
pub struct HttpConfigStore {
    base_url: String,
    client: reqwest::Client,
    auth: Option<(String, String)>,
}

impl HttpConfigStore {
    /// Build a client from server settings
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, ConfigStoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ConfigStoreError::Request(e.to_string()))?;

        let auth = match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    fn config_url(&self) -> String {
        format!("{}{}", self.base_url, CONFIG_PATH)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn fetch(&self) -> Result<(CruiseConfig, ConfigVersion), ConfigStoreError> {
        debug!("Fetching configuration from {}", self.config_url());

        let response = self
            .authorized(self.client.get(self.config_url()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ConfigStoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ConfigStoreError::Api { status, message });
        }

        let version = response
            .headers()
            .get("ETag")
            .and_then(|v| v.to_str().ok())
            .map(|v| ConfigVersion::new(v.trim_matches('"')))
            .ok_or_else(|| {
                ConfigStoreError::Decode("response carried no ETag version header".to_string())
            })?;

        let config: CruiseConfig = response
            .json()
            .await
            .map_err(|e| ConfigStoreError::Decode(e.to_string()))?;

        debug!(
            "Fetched {} pipeline(s) at version {}",
            config.pipeline_count(),
            version
        );
        Ok((config, version))
    }

    async fn push(
        &self,
        config: &CruiseConfig,
        version: &ConfigVersion,
    ) -> Result<ConfigVersion, ConfigStoreError> {
        debug!(
            "Pushing {} pipeline(s) against version {}",
            config.pipeline_count(),
            version
        );

        let response = self
            .authorized(self.client.put(self.config_url()))
            .header("Accept", "application/json")
            .header("If-Match", format!("\"{}\"", version.as_str()))
            .json(config)
            .send()
            .await
            .map_err(|e| ConfigStoreError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::PRECONDITION_FAILED {
            return Err(ConfigStoreError::Conflict {
                version: version.as_str().to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ConfigStoreError::Api { status, message });
        }

        let new_version = response
            .headers()
            .get("ETag")
            .and_then(|v| v.to_str().ok())
            .map(|v| ConfigVersion::new(v.trim_matches('"')))
            .ok_or_else(|| {
                ConfigStoreError::Decode("response carried no ETag version header".to_string())
            })?;

        Ok(new_version)
    }
}
