//! Conversation data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AskError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One rendered turn. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Strictly increasing within a session; doubles as a render key.
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Everything a render layer needs to draw the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Display order; append-only.
    pub messages: Vec<Message>,
    /// True exactly while a question is in flight.
    pub pending: bool,
    /// Cause of the most recent failure, cleared by the next success.
    pub last_error: Option<AskError>,
}

impl ConversationState {
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Messages with an id greater than `id`, for incremental renderers.
    #[must_use]
    pub fn messages_after(&self, id: u64) -> &[Message] {
        let start = self.messages.partition_point(|m| m.id <= id);
        &self.messages[start..]
    }
}
