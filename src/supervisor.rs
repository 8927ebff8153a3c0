//! Lifecycle management for the long-running bot services.
//!
//! The supervisor owns the alert poller, spawns it alongside a signal
//! listener, and orchestrates a graceful shutdown: on SIGINT/SIGTERM (or a
//! failed task) every service is cancelled cooperatively and in-flight work
//! is drained within a bounded timeout.

use std::sync::Arc;

use tokio::{signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    alert::poller::{AlertPoller, AlertStatus},
    config::AppConfig,
    models::ChannelId,
    providers::traits::{AlertSource, NotificationSink, ReadinessGate},
};

/// The primary runtime manager for the application.
///
/// Owns the long-running services and is responsible for their startup,
/// shutdown, and health monitoring.
pub struct Supervisor<S, N, R>
where
    S: AlertSource + ?Sized + 'static,
    N: NotificationSink + ?Sized + 'static,
    R: ReadinessGate + ?Sized + 'static,
{
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// The alert polling service, moved into its task on `run`.
    poller: AlertPoller<S, N, R>,
    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: CancellationToken,
    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: JoinSet<()>,
}

impl<S, N, R> Supervisor<S, N, R>
where
    S: AlertSource + ?Sized + 'static,
    N: NotificationSink + ?Sized + 'static,
    R: ReadinessGate + ?Sized + 'static,
{
    /// Creates a new Supervisor wiring the alert poller to its collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<S>,
        sink: Arc<N>,
        readiness: Arc<R>,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let poller = AlertPoller::new(
            Arc::clone(&config),
            source,
            sink,
            readiness,
            cancellation_token.clone(),
        );
        Self {
            config,
            poller,
            cancellation_token,
            join_set: JoinSet::new(),
        }
    }

    /// Returns a read-only handle to the current alert snapshot, for status
    /// queries by the hosting bot.
    pub fn alert_status(&self) -> AlertStatus {
        self.poller.status()
    }

    /// Returns the channel alert notifications target, for hosts that
    /// deliver through a gateway session instead of the webhook sink.
    pub fn alert_channel(&self) -> ChannelId {
        self.config.alert.channel_id
    }

    /// Starts the supervised services and blocks until shutdown.
    pub async fn run(mut self) {
        // Spawn a task to listen for shutdown signals.
        let cancellation_token = self.cancellation_token.clone();
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await;
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown.");
                    cancellation_token.cancel();
                }
                _ = terminate => {
                    tracing::info!("SIGTERM received, initiating graceful shutdown.");
                    cancellation_token.cancel();
                }
                _ = cancellation_token.cancelled() => {}
            }
        });

        // Spawn the alert polling service.
        let poller = self.poller;
        self.join_set.spawn(async move {
            poller.run().await;
        });

        // Monitor task health until shutdown is requested or all tasks end.
        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed, keep monitoring the rest.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A supervised task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => break,
                    }
                }
                _ = self.cancellation_token.cancelled() => break,
            }
        }

        // Drain in-flight work rather than abandoning it mid-iteration.
        self.cancellation_token.cancel();
        let shutdown_timeout = self.config.shutdown_timeout;
        let drain = async {
            while self.join_set.join_next().await.is_some() {}
        };
        if tokio::time::timeout(shutdown_timeout, drain).await.is_err() {
            tracing::warn!(
                "Tasks did not finish within {:?}, aborting the remainder.",
                shutdown_timeout
            );
            self.join_set.shutdown().await;
        }

        tracing::info!("Supervisor shutdown complete.");
    }
}
