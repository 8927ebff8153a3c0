//! Interfaces over the external collaborators the core depends on: the alert
//! document source, the notification sink, the session readiness gate, and
//! the channel history/deletion capabilities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::{ChannelId, ChannelMessage, MessageId};

/// Custom error type for alert source operations.
#[derive(Debug, Error)]
pub enum AlertSourceError {
    /// The request failed at the transport level (includes timeouts).
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The source answered with a non-success status code.
    #[error("alert source returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[from] reqwest::Error),
}

/// A source of the raw alert document.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetches the current alert document as text.
    async fn fetch_document(&self) -> Result<String, AlertSourceError>;
}

/// Custom error type for notification delivery.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The request failed at the transport level.
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The endpoint answered with a non-success status code.
    #[error("notification endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A sink that delivers a rendered alert into the target channel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one rendered alert. Failures are logged by the caller, never
    /// retried; the tracker state is already committed by then.
    async fn send(&self, rendered: &str) -> Result<(), NotificationError>;
}

/// Gates the poller on the hosting session being established.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadinessGate: Send + Sync {
    /// Resolves once the hosting session is ready.
    async fn wait_ready(&self);
}

/// A readiness gate that resolves immediately, for deployments (such as
/// webhook delivery) with no session handshake to wait on.
pub struct ImmediateReadiness;

#[async_trait]
impl ReadinessGate for ImmediateReadiness {
    async fn wait_ready(&self) {}
}

/// Custom error type for channel history retrieval.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The history query failed.
    #[error("history fetch failed: {0}")]
    Fetch(String),
}

/// Retrieves message history for a channel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches the messages of a channel, oldest first, restricted to
    /// messages created at or after `since` when a bound is given.
    async fn fetch(
        &self,
        channel: ChannelId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ChannelMessage>, HistoryError>;
}

/// Custom error type for message deletion calls.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The platform rejected or failed the deletion.
    #[error("delete failed: {0}")]
    Failed(String),
}

/// Deletes messages from a channel, one at a time or in bulk.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeleteCapability: Send + Sync {
    /// Deletes a single message.
    async fn delete_one(&self, channel: ChannelId, message: MessageId) -> Result<(), DeleteError>;

    /// Deletes up to 100 messages in one platform call. The platform rejects
    /// bulk deletion of messages older than its age ceiling.
    async fn delete_bulk(
        &self,
        channel: ChannelId,
        messages: &[MessageId],
    ) -> Result<(), DeleteError>;
}
