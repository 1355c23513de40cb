//! WebhookDispatcher -- concrete [`BuildDispatcher`] posting to the downstream
//! SMS bot's inbound webhook.
//!
//! Each call is exactly one form-encoded POST; nothing is retried.

use reqwest::StatusCode;

use webtoys_core::dispatch::BuildDispatcher;
use webtoys_types::config::RelayConfig;
use webtoys_types::error::DispatchError;
use webtoys_types::request::{BuildRequest, DispatchAck};

pub struct WebhookDispatcher {
    client: reqwest::Client,
    endpoint: String,
    strict_status: bool,
}

impl WebhookDispatcher {
    pub fn new(config: &RelayConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.downstream.request_timeout())
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.downstream.webhook_base_url.trim_end_matches('/'),
                config.dispatch.webhook_path
            ),
            strict_status: config.dispatch.strict_status,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl BuildDispatcher for WebhookDispatcher {
    async fn dispatch(&self, request: &BuildRequest) -> Result<DispatchAck, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(request)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DispatchError::NotFound);
        }

        if !status.is_success() {
            if self.strict_status {
                return Err(DispatchError::Rejected {
                    status: status.as_u16(),
                });
            }
            tracing::warn!(
                status = status.as_u16(),
                endpoint = %self.endpoint,
                "webhook returned non-success status, treating as acknowledged"
            );
        }

        Ok(DispatchAck {
            status: status.as_u16(),
        })
    }
}
