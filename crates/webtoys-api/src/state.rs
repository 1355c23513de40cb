//! Shared application state for the CLI and the HTTP server.

use std::sync::Arc;

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use webtoys_core::orchestrator::BuildOrchestrator;
use webtoys_infra::digest::ConfiguredDigest;
use webtoys_infra::store::RestArtifactStore;
use webtoys_infra::webhook::WebhookDispatcher;
use webtoys_types::config::RelayConfig;
use webtoys_types::result::BuildResult;

use crate::config::LoadedConfig;

/// Orchestrator wired to the production adapters.
pub type ConcreteOrchestrator = BuildOrchestrator<ConfiguredDigest, WebhookDispatcher, RestArtifactStore>;

/// Cloned into every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<RelayConfig>,
    /// Cancelled on server shutdown; each request works on a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn init(loaded: LoadedConfig) -> anyhow::Result<Self> {
        let LoadedConfig {
            relay, store_key, ..
        } = loaded;

        let store_key = store_key.unwrap_or_else(|| {
            tracing::warn!("no content-store service key configured; store queries will be unauthenticated");
            SecretString::from(String::new())
        });

        let dispatcher = WebhookDispatcher::new(&relay)?;
        let store = RestArtifactStore::new(&relay, store_key)?;
        let digest = ConfiguredDigest::from(relay.identity.digest);
        let orchestrator = BuildOrchestrator::new(&relay, digest, dispatcher, store);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(relay),
            shutdown: CancellationToken::new(),
        })
    }

    /// Run one build on a request-scoped child of the shutdown token.
    ///
    /// If the returned future is dropped (client went away), the drop guard
    /// cancels the child token so nothing keeps polling for it.
    pub async fn run_build(&self, description: &str, user_id: Option<&str>) -> BuildResult {
        let cancel = self.shutdown.child_token();
        let _guard = cancel.clone().drop_guard();
        self.orchestrator.build(description, user_id, &cancel).await
    }
}
