//! The alert change-detection engine.
//!
//! A periodic poller fetches an external notice document, extracts the alert
//! text between fixed markers, and runs it through a deduplicating tracker so
//! that each distinct alert is announced at most once. The alert that is
//! already active when the process starts is recorded but never re-announced.

pub mod poller;
pub mod tracker;
