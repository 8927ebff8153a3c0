//! Platform-facing data models shared across the crate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Identifier of a platform user (a message author or command invoker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct UserId(pub u64);

/// Identifier of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct ChannelId(pub u64);

/// Identifier of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message as returned by a channel history query.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    /// The message identifier.
    pub id: MessageId,
    /// The author of the message.
    pub author_id: UserId,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// The message text.
    pub content: String,
}
