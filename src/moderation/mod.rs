//! Moderation utilities.
//!
//! Currently a single routine: best-effort bulk deletion of one actor's
//! messages in a channel, driven by a validated time range and a
//! bulk-versus-individual deletion strategy per batch.

pub mod deleter;
pub mod range;
