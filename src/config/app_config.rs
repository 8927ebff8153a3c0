use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{HttpClientConfig, deserialize_duration_from_seconds};
use crate::models::ChannelId;

/// Provides the default value for shutdown_timeout.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Provides the default value for poll_interval_secs.
fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

/// Provides the default start marker, matching the upstream alert feed.
fn default_start_marker() -> String {
    "alert_content = ".to_string()
}

/// Provides the default end marker, matching the upstream alert feed.
fn default_end_marker() -> String {
    "alert_default =".to_string()
}

/// Provides the default deletion batch size.
fn default_batch_size() -> usize {
    100
}

/// Provides the platform's bulk-delete age ceiling in days.
fn default_bulk_age_ceiling_days() -> i64 {
    14
}

/// Settings for the alert polling service.
#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// URL of the external alert document to poll.
    pub source_url: Url,

    /// Webhook endpoint that receives rendered alert notifications.
    pub webhook_url: Url,

    /// Identifier of the channel the notifications target.
    pub channel_id: ChannelId,

    /// Marker preceding the alert text in the polled document.
    #[serde(default = "default_start_marker")]
    pub start_marker: String,

    /// Marker following the alert text in the polled document.
    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    /// The interval in seconds between polls of the alert source.
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub poll_interval_secs: Duration,
}

/// Settings for the bulk message deletion routine.
#[derive(Debug, Deserialize, Clone)]
pub struct ModerationConfig {
    /// How many messages are processed as one deletion batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Age in days above which the platform rejects bulk deletion.
    #[serde(default = "default_bulk_age_ceiling_days")]
    pub bulk_age_ceiling_days: i64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            bulk_age_ceiling_days: default_bulk_age_ceiling_days(),
        }
    }
}

/// Application configuration for Vigil.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Alert polling settings.
    pub alert: AlertConfig,

    /// Bulk deletion settings.
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpClientConfig,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub shutdown_timeout: Duration,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    ///
    /// Values from `<dir>/app.yaml` can be overridden through environment
    /// variables prefixed with `VIGIL__`, e.g. `VIGIL__ALERT__SOURCE_URL`.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/app.yaml")))
            .add_source(Environment::with_prefix("VIGIL").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
