#![warn(missing_docs)]
//! Vigil is a community chat bot core: it relays externally published campus
//! alert notices into a channel with change detection and deduplication, and
//! provides a bulk message-deletion routine for moderation.

pub mod alert;
pub mod config;
pub mod extract;
pub mod http_client;
pub mod models;
pub mod moderation;
pub mod notification;
pub mod providers;
pub mod supervisor;
pub mod test_helpers;
