//! Webhook-backed notification sink.
//!
//! Posts rendered alerts as a JSON payload to an incoming-webhook endpoint.
//! Payload shaping beyond the platform's `content` field is a collaborator
//! concern and stays out of this crate.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::json;
use url::Url;

use crate::providers::traits::{NotificationError, NotificationSink};

/// Delivers rendered alerts to an incoming webhook.
pub struct WebhookSink {
    /// HTTP client with timeout and retry middleware.
    client: ClientWithMiddleware,
    /// The webhook endpoint.
    url: Url,
}

impl WebhookSink {
    /// Creates a new `WebhookSink` for the given webhook URL.
    pub fn new(client: ClientWithMiddleware, url: Url) -> Self {
        Self { client, url }
    }
}

/// Builds the webhook payload for a rendered alert.
fn build_payload(rendered: &str) -> serde_json::Value {
    json!({ "content": rendered })
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, rendered: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&build_payload(rendered))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Status(status));
        }
        Ok(())
    }
}
