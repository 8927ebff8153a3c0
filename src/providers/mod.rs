//! Collaborator capabilities consumed by the core services.
//!
//! The alert poller and the bulk deleter never talk to the hosting platform
//! directly; they work against the traits defined here, with concrete
//! implementations injected at startup.

pub mod http;
pub mod traits;
