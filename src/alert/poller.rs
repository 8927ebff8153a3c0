//! The periodic alert polling service.
//!
//! This service runs a continuous loop that fetches the alert document,
//! extracts the notice text, and evaluates it against the tracker. Only a
//! `Changed` decision produces a notification, and it is sent exactly once
//! per change. A failed fetch is invisible to the tracker: the tick is
//! skipped and the loop carries on.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    alert::tracker::{AlertSnapshot, AlertTracker},
    config::AppConfig,
    extract,
    providers::traits::{AlertSource, NotificationSink, ReadinessGate},
};

/// A cloneable, read-only view of the poller's last alert snapshot.
///
/// The tracker itself stays owned by the poller; status queries (the `alert`
/// command of the hosting bot) only ever observe a copy.
#[derive(Clone)]
pub struct AlertStatus {
    tracker: Arc<Mutex<AlertTracker>>,
}

impl AlertStatus {
    /// Returns a copy of the most recent snapshot.
    pub async fn current(&self) -> AlertSnapshot {
        self.tracker.lock().await.snapshot()
    }
}

/// The alert polling service.
///
/// One iteration is strictly sequential (fetch, evaluate, notify); the next
/// tick only starts after the previous iteration has finished, and a
/// cancellation lets the in-flight iteration run to completion.
pub struct AlertPoller<
    S: AlertSource + ?Sized,
    N: NotificationSink + ?Sized,
    R: ReadinessGate + ?Sized,
> {
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// The source of the raw alert document.
    source: Arc<S>,
    /// The sink that delivers rendered notifications.
    sink: Arc<N>,
    /// Gate that resolves once the hosting session is ready.
    readiness: Arc<R>,
    /// The change-detection state, owned by this poller.
    tracker: Arc<Mutex<AlertTracker>>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl<S, N, R> AlertPoller<S, N, R>
where
    S: AlertSource + ?Sized,
    N: NotificationSink + ?Sized,
    R: ReadinessGate + ?Sized,
{
    /// Creates a new `AlertPoller` with a fresh, never-polled tracker.
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<S>,
        sink: Arc<N>,
        readiness: Arc<R>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            source,
            sink,
            readiness,
            tracker: Arc::new(Mutex::new(AlertTracker::new(Utc::now()))),
            cancellation_token,
        }
    }

    /// Returns a read-only handle to the current alert snapshot.
    pub fn status(&self) -> AlertStatus {
        AlertStatus {
            tracker: Arc::clone(&self.tracker),
        }
    }

    /// Starts the long-running polling loop.
    ///
    /// Waits for the readiness gate once, then polls on the configured
    /// interval until cancelled. The first poll fires as soon as the gate
    /// resolves; the interval only spaces out the polls after it.
    pub async fn run(self) {
        self.readiness.wait_ready().await;
        tracing::info!(
            source_url = %self.config.alert.source_url,
            interval = ?self.config.alert.poll_interval_secs,
            "Alert poller started."
        );

        if !self.cancellation_token.is_cancelled() {
            self.poll_once().await;
        }

        loop {
            let tick = tokio::time::sleep(self.config.alert.poll_interval_secs);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("AlertPoller cancellation signal received, shutting down...");
                    break;
                }

                _ = tick => {
                    self.poll_once().await;
                }
            }
        }
        tracing::info!("AlertPoller has shut down.");
    }

    /// Performs one fetch/evaluate/notify cycle.
    async fn poll_once(&self) {
        let document = match self.source.fetch_document().await {
            Ok(document) => document,
            Err(e) => {
                // Fail-soft: the tracker never learns about a failed poll.
                tracing::warn!(error = %e, "Alert poll failed, skipping this tick.");
                return;
            }
        };

        // A document without markers reads as "no active alert".
        let text = match extract::between_markers(
            &document,
            &self.config.alert.start_marker,
            &self.config.alert.end_marker,
        ) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "No alert text found in document.");
                String::new()
            }
        };

        let (decision, snapshot) = {
            let mut tracker = self.tracker.lock().await;
            let decision = tracker.evaluate(&text, Utc::now());
            (decision, tracker.snapshot())
        };
        tracing::debug!(?decision, "Alert evaluation completed.");

        if decision.should_notify() {
            // The snapshot is already committed; a sink failure is logged
            // and not retried.
            if let Err(e) = self.sink.send(&render_alert(&snapshot)).await {
                tracing::error!(error = %e, "Failed to deliver alert notification.");
            }
        }
    }
}

/// Renders a snapshot into the outbound notification text.
fn render_alert(snapshot: &AlertSnapshot) -> String {
    format!(
        "**CAMPUS ALERT**\n\n{}\n\n_This alert was generated at {}_",
        snapshot.text, snapshot.captured_at
    )
}
