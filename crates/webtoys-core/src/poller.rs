//! Artifact poller: a bounded, time-windowed wait for a downstream artifact.
//!
//! State machine:
//!
//! ```text
//! Init --initial_delay--> Polling --match--> Found
//!                           |  ^
//!                  no match |  | interval
//!                  / error  v  |
//!                         (sleep)
//!                           |
//!                  deadline elapsed --> NotFound
//! ```
//!
//! Every wait races a `CancellationToken`; cancelling it ends the loop with
//! `PollOutcome::Cancelled` at the next suspension point. A failed store query
//! never aborts the loop: it is logged, counted in [`PollStats`], and treated
//! as "no match this round".

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use webtoys_types::artifact::{Artifact, ArtifactRecord};
use webtoys_types::config::PollConfig;
use webtoys_types::error::StoreError;
use webtoys_types::identity::SyntheticIdentifier;

use crate::store::ArtifactStore;

/// Poll timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub max_wait: Duration,
}

impl From<&PollConfig> for PollSettings {
    fn from(config: &PollConfig) -> Self {
        Self {
            initial_delay: config.initial_delay(),
            interval: config.interval(),
            max_wait: config.max_wait(),
        }
    }
}

/// The window opened when a build request is about to be dispatched.
///
/// `started_at` is the wall-clock lower bound for `created_at` in store
/// queries; `started` is the monotonic instant the deadline is measured from.
#[derive(Debug, Clone)]
pub struct PollWindow {
    pub sender: SyntheticIdentifier,
    pub started_at: DateTime<Utc>,
    pub started: Instant,
}

impl PollWindow {
    pub fn open(sender: SyntheticIdentifier) -> Self {
        Self {
            sender,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }
}

/// Result of a single store query.
#[derive(Debug)]
pub enum PollAttempt {
    Match(ArtifactRecord),
    NoMatch,
    /// The query failed; swallowed and retried at the next interval.
    QueryFailed(StoreError),
}

/// Counters reported with every outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub attempts: u32,
    pub failed_queries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Found { artifact: Artifact, stats: PollStats },
    /// The deadline elapsed without a match. Expected when the build is slow.
    NotFound { stats: PollStats },
    Cancelled { stats: PollStats },
}

impl PollOutcome {
    pub fn stats(&self) -> PollStats {
        match self {
            PollOutcome::Found { stats, .. }
            | PollOutcome::NotFound { stats }
            | PollOutcome::Cancelled { stats } => *stats,
        }
    }
}

/// Polls an [`ArtifactStore`] until a matching artifact appears or the
/// window's deadline passes.
pub struct ArtifactPoller<S> {
    store: S,
    settings: PollSettings,
    public_base_url: String,
}

impl<S: ArtifactStore> ArtifactPoller<S> {
    pub fn new(store: S, settings: PollSettings, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            settings,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run the poll loop for `window`.
    pub async fn poll(&self, window: &PollWindow, cancel: &CancellationToken) -> PollOutcome {
        let deadline = window.started + self.settings.max_wait;
        let mut stats = PollStats::default();

        if !sleep_or_cancel(self.settings.initial_delay, cancel).await {
            return PollOutcome::Cancelled { stats };
        }

        while Instant::now() < deadline {
            stats.attempts += 1;

            // A query still in flight at the deadline is abandoned.
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return PollOutcome::Cancelled { stats },
                attempt = tokio::time::timeout_at(deadline, self.attempt(window)) => {
                    attempt.unwrap_or(PollAttempt::QueryFailed(StoreError::DeadlineExceeded))
                }
            };

            match attempt {
                PollAttempt::Match(record) => {
                    let artifact = Artifact::from_record(&self.public_base_url, &record);
                    tracing::debug!(
                        sender = %window.sender,
                        attempt = stats.attempts,
                        url = %artifact.url,
                        "artifact found"
                    );
                    return PollOutcome::Found { artifact, stats };
                }
                PollAttempt::NoMatch => {
                    tracing::debug!(
                        sender = %window.sender,
                        attempt = stats.attempts,
                        "no artifact yet"
                    );
                }
                PollAttempt::QueryFailed(error) => {
                    stats.failed_queries += 1;
                    tracing::warn!(
                        sender = %window.sender,
                        attempt = stats.attempts,
                        error = %error,
                        "artifact query failed, retrying next interval"
                    );
                }
            }

            let pause = self
                .settings
                .interval
                .min(deadline.saturating_duration_since(Instant::now()));
            if !sleep_or_cancel(pause, cancel).await {
                return PollOutcome::Cancelled { stats };
            }
        }

        PollOutcome::NotFound { stats }
    }

    /// Issue one store query and classify the answer.
    async fn attempt(&self, window: &PollWindow) -> PollAttempt {
        match self
            .store
            .latest_published(&window.sender, window.started_at)
            .await
        {
            Ok(Some(record)) if record.matches(&window.sender, window.started_at) => {
                PollAttempt::Match(record)
            }
            Ok(Some(record)) => {
                tracing::debug!(
                    app_slug = %record.app_slug,
                    "store returned a row outside the poll window, ignoring"
                );
                PollAttempt::NoMatch
            }
            Ok(None) => PollAttempt::NoMatch,
            Err(e) => PollAttempt::QueryFailed(e),
        }
    }
}

/// Sleep for `duration` unless cancelled first. Returns `false` on cancellation.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
