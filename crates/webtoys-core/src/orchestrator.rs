//! Build orchestrator: the end-to-end correlation-and-poll flow.
//!
//! One call to [`BuildOrchestrator::build`] maps the caller token, dispatches
//! exactly one build request, and (for artifact-producing descriptions) polls
//! the content store until the artifact shows up or the window closes. The
//! caller always gets exactly one [`BuildResult`]; errors and panics inside
//! the flow are converted at the top.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures_util::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use webtoys_types::config::{DispatchConfig, RelayConfig};
use webtoys_types::error::BuildError;
use webtoys_types::identity::SyntheticIdentifier;
use webtoys_types::request::BuildRequest;
use webtoys_types::result::BuildResult;

use crate::classify::TriggerClassifier;
use crate::dispatch::BuildDispatcher;
use crate::identity::{IdentityMapper, TokenDigest};
use crate::poller::{ArtifactPoller, PollOutcome, PollSettings, PollWindow};
use crate::store::ArtifactStore;

pub struct BuildOrchestrator<H, D, S> {
    identity: IdentityMapper<H>,
    dispatcher: D,
    poller: ArtifactPoller<S>,
    classifier: TriggerClassifier,
    dispatch_config: DispatchConfig,
    fallback_profile_url: String,
    /// `None` when `server.max_concurrent_builds == 0`.
    limiter: Option<Arc<Semaphore>>,
}

impl<H, D, S> BuildOrchestrator<H, D, S>
where
    H: TokenDigest,
    D: BuildDispatcher,
    S: ArtifactStore,
{
    pub fn new(config: &RelayConfig, digest: H, dispatcher: D, store: S) -> Self {
        let limiter = match config.server.max_concurrent_builds {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        Self {
            identity: IdentityMapper::new(digest),
            dispatcher,
            poller: ArtifactPoller::new(
                store,
                PollSettings::from(&config.poll),
                config.downstream.public_base_url.clone(),
            ),
            classifier: TriggerClassifier::from_config(&config.classifier),
            dispatch_config: config.dispatch.clone(),
            fallback_profile_url: config.downstream.fallback_profile_url.clone(),
            limiter,
        }
    }

    /// Synthetic identifier for `token`, without dispatching anything.
    pub fn identify(&self, token: Option<&str>) -> SyntheticIdentifier {
        self.identity.map(token)
    }

    pub fn classifier(&self) -> &TriggerClassifier {
        &self.classifier
    }

    /// Run one build invocation to completion.
    ///
    /// Never fails: dispatch errors, saturation, cancellation and panics all
    /// come back as `success: false` with the raw cause in `error`.
    pub async fn build(
        &self,
        description: &str,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> BuildResult {
        let flow = AssertUnwindSafe(self.try_build(description, token, cancel));

        match flow.catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "build failed");
                BuildResult::failed(e.to_string())
            }
            Err(payload) => {
                let cause = BuildError::Unclassified(panic_message(payload.as_ref()));
                tracing::error!(error = %cause, "build panicked");
                BuildResult::failed(cause.to_string())
            }
        }
    }

    async fn try_build(
        &self,
        description: &str,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<BuildResult, BuildError> {
        let _permit = self.acquire_permit()?;

        let sender = self.identity.map(token);
        let span = tracing::info_span!("build", sender = %sender);

        async move {
            let window = PollWindow::open(sender.clone());

            if cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }

            let request = BuildRequest::new(description, sender, &self.dispatch_config, Utc::now());
            let ack = self.dispatcher.dispatch(&request).await?;
            tracing::info!(
                status = ack.status,
                message_sid = %request.message_sid,
                "build request dispatched"
            );

            if !self.classifier.is_artifact_producing(description) {
                tracing::debug!("description has no trigger keyword, skipping poll");
                return Ok(BuildResult::processed());
            }

            let outcome = self.poller.poll(&window, cancel).await;
            let stats = outcome.stats();
            let elapsed_ms = window.started.elapsed().as_millis() as u64;

            match outcome {
                PollOutcome::Found { artifact, .. } => {
                    tracing::info!(
                        url = %artifact.url,
                        attempts = stats.attempts,
                        failed_queries = stats.failed_queries,
                        elapsed_ms,
                        "artifact located"
                    );
                    Ok(BuildResult::found(artifact))
                }
                PollOutcome::NotFound { .. } => {
                    tracing::info!(
                        attempts = stats.attempts,
                        failed_queries = stats.failed_queries,
                        elapsed_ms,
                        "poll window closed without a match"
                    );
                    Ok(BuildResult::pending(&self.fallback_profile_url))
                }
                PollOutcome::Cancelled { .. } => {
                    tracing::info!(attempts = stats.attempts, elapsed_ms, "poll cancelled");
                    Err(BuildError::Cancelled)
                }
            }
        }
        .instrument(span)
        .await
    }

    fn acquire_permit(&self) -> Result<Option<OwnedSemaphorePermit>, BuildError> {
        match &self.limiter {
            None => Ok(None),
            Some(semaphore) => semaphore
                .clone()
                .try_acquire_owned()
                .map(Some)
                .map_err(|_| BuildError::Busy),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "build flow panicked".to_string()
    }
}
