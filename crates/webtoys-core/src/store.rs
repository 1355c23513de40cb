//! ArtifactStore trait definition.

use chrono::{DateTime, Utc};

use webtoys_types::artifact::ArtifactRecord;
use webtoys_types::error::StoreError;
use webtoys_types::identity::SyntheticIdentifier;

/// Read-only view of the downstream content store.
///
/// Implementations live in webtoys-infra (e.g., `RestArtifactStore`).
pub trait ArtifactStore: Send + Sync {
    /// Newest published record sent by `sender` and created at or after
    /// `since`, if any. One query per call.
    fn latest_published(
        &self,
        sender: &SyntheticIdentifier,
        since: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<ArtifactRecord>, StoreError>> + Send;
}
