//! A set of helpers for testing

use chrono::{DateTime, Utc};

use crate::models::{ChannelMessage, MessageId, UserId};

/// A builder for creating `ChannelMessage` instances for testing.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    id: u64,
    author: u64,
    created_at: DateTime<Utc>,
    content: String,
}

impl MessageBuilder {
    /// Creates a new `MessageBuilder` with placeholder defaults.
    pub fn new() -> Self {
        Self {
            id: 1,
            author: 1,
            created_at: Utc::now(),
            content: "hello".to_string(),
        }
    }

    /// Sets the message id.
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Sets the author id.
    pub fn author(mut self, author: u64) -> Self {
        self.author = author;
        self
    }

    /// Sets the creation time.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the message text.
    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Builds the `ChannelMessage` with the provided or default values.
    pub fn build(self) -> ChannelMessage {
        ChannelMessage {
            id: MessageId(self.id),
            author_id: UserId(self.author),
            created_at: self.created_at,
            content: self.content,
        }
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
