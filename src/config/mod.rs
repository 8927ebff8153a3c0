//! Configuration module for Vigil.

mod app_config;
mod helpers;
mod http;

pub use app_config::{AlertConfig, AppConfig, ModerationConfig};
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
pub use http::{HttpClientConfig, HttpRetryConfig, JitterSetting};
