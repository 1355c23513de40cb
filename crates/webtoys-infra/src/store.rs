//! RestArtifactStore -- concrete [`ArtifactStore`] over the content store's
//! PostgREST interface.
//!
//! The service key is wrapped in [`secrecy::SecretString`] and only exposed
//! when building request headers.

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};

use webtoys_core::store::ArtifactStore;
use webtoys_types::artifact::ArtifactRecord;
use webtoys_types::config::RelayConfig;
use webtoys_types::error::StoreError;
use webtoys_types::identity::SyntheticIdentifier;

/// Columns requested from the artifact table.
const SELECT_COLUMNS: &str = "app_slug,user_slug,created_at,type,sender_phone,status";

pub struct RestArtifactStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl RestArtifactStore {
    pub fn new(config: &RelayConfig, api_key: SecretString) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.downstream.request_timeout())
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.downstream.store_base_url.trim_end_matches('/'),
                config.downstream.store_table
            ),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ArtifactStore for RestArtifactStore {
    async fn latest_published(
        &self,
        sender: &SyntheticIdentifier,
        since: DateTime<Utc>,
    ) -> Result<Option<ArtifactRecord>, StoreError> {
        let key = self.api_key.expose_secret();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("select", SELECT_COLUMNS.to_string()),
                ("sender_phone", format!("eq.{sender}")),
                (
                    "created_at",
                    format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Micros, true)),
                ),
                ("status", "eq.published".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", "1".to_string()),
            ])
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let rows: Vec<ArtifactRecord> =
            serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}
