//! The terminal result of one build invocation.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

/// Message returned when a description does not look like an app request.
pub const PROCESSED_MESSAGE: &str = "command processed";

/// Result returned exactly once per `build_webtoys_app` call.
///
/// `appUrl` is always serialized (as `null` when absent) so callers can
/// branch on it; the other optional fields are omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub success: bool,
    #[serde(default)]
    pub app_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Fallback profile page, set when the poll window closed without a match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BuildResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            app_url: None,
            app_type: None,
            message: None,
            user_url: None,
            error: Some(error.into()),
        }
    }

    /// Dispatched, but not an artifact-producing request.
    pub fn processed() -> Self {
        Self {
            success: true,
            app_url: None,
            app_type: None,
            message: Some(PROCESSED_MESSAGE.to_string()),
            user_url: None,
            error: None,
        }
    }

    pub fn found(artifact: Artifact) -> Self {
        Self {
            success: true,
            message: Some(format!("Your Webtoys app is ready! View it at {}", artifact.url)),
            app_url: Some(artifact.url),
            app_type: Some(artifact.app_type),
            user_url: None,
            error: None,
        }
    }

    /// The poll window closed; the build is still expected to finish.
    pub fn pending(fallback_profile_url: &str) -> Self {
        Self {
            success: true,
            app_url: None,
            app_type: None,
            message: Some(format!(
                "Your Webtoys app is being built and should be ready in 2-3 minutes. \
                 Check {fallback_profile_url} for your creation."
            )),
            user_url: Some(fallback_profile_url.to_string()),
            error: None,
        }
    }

    /// One-line human summary, used by text-only transports.
    pub fn summary(&self) -> String {
        match (&self.message, &self.error) {
            (Some(message), _) => message.clone(),
            (None, Some(error)) => format!("Error: {error}"),
            (None, None) if self.success => PROCESSED_MESSAGE.to_string(),
            (None, None) => "Error: unknown failure".to_string(),
        }
    }
}
