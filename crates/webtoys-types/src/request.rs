//! The outbound build request, shaped like an inbound SMS webhook.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::DispatchConfig;
use crate::identity::SyntheticIdentifier;

/// Form payload posted to the downstream webhook.
///
/// Field names follow the downstream contract (`Body`, `From`, `To`,
/// `MessageSid`, `AccountSid`, `NumMedia`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildRequest {
    pub body: String,
    pub from: SyntheticIdentifier,
    pub to: String,
    pub message_sid: String,
    pub account_sid: String,
    pub num_media: String,
}

impl BuildRequest {
    /// Assemble a request for `description` sent from `sender` at `now`.
    ///
    /// `now` feeds the correlation tag, so two calls at different instants
    /// never share a `MessageSid`.
    pub fn new(
        description: &str,
        sender: SyntheticIdentifier,
        config: &DispatchConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            body: description.to_string(),
            from: sender,
            to: config.recipient.clone(),
            message_sid: format!(
                "{}_{}",
                config.message_sid_prefix,
                now.to_rfc3339_opts(SecondsFormat::Micros, true)
            ),
            account_sid: config.account_sid.clone(),
            num_media: config.num_media.clone(),
        }
    }
}

/// Acknowledgement of a dispatched build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchAck {
    /// HTTP status returned by the webhook.
    pub status: u16,
}

impl DispatchAck {
    /// Whether the webhook answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
