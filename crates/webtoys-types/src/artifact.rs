//! Artifact records read from the downstream content store.
//!
//! The store owns these rows; the relay only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::SyntheticIdentifier;

/// Artifact type reported when the store row has none.
pub const DEFAULT_APP_TYPE: &str = "web";

/// Publication state of a stored artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Published,
    #[default]
    #[serde(other)]
    Unpublished,
}

/// One row of the content store's artifact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub app_slug: String,
    /// Slug of the owning user profile.
    pub user_slug: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub app_type: Option<String>,
    #[serde(default)]
    pub sender_phone: Option<String>,
    #[serde(default)]
    pub status: PublicationStatus,
}

impl ArtifactRecord {
    /// Whether this row is the artifact produced for `sender` in a window
    /// that started at `since`.
    pub fn matches(&self, sender: &SyntheticIdentifier, since: DateTime<Utc>) -> bool {
        self.status == PublicationStatus::Published
            && self.created_at >= since
            && self.sender_phone.as_deref() == Some(sender.as_str())
    }
}

/// A located artifact: public URL plus type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    pub app_type: String,
}

impl Artifact {
    /// Derive the public artifact from a store row: `<base>/<user_slug>/<app_slug>`.
    pub fn from_record(public_base_url: &str, record: &ArtifactRecord) -> Self {
        let app_type = record
            .app_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_APP_TYPE)
            .to_string();

        Self {
            url: format!(
                "{}/{}/{}",
                public_base_url.trim_end_matches('/'),
                record.user_slug,
                record.app_slug
            ),
            app_type,
        }
    }
}
