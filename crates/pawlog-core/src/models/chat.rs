//! Chat history and saved AI conversations.

use serde::{Deserialize, Serialize};

use crate::store::{Record, Timestamped};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// `None` for the global, unscoped conversation
    #[serde(default)]
    pub cat_id: Option<String>,
    pub role: Role,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(cat_id: Option<&str>, role: Role, content: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.map(str::to_string),
            role,
            content: content.into(),
            timestamp: now_millis,
        }
    }

    pub fn user(cat_id: Option<&str>, content: impl Into<String>, now_millis: i64) -> Self {
        Self::new(cat_id, Role::User, content, now_millis)
    }

    pub fn assistant(cat_id: Option<&str>, content: impl Into<String>, now_millis: i64) -> Self {
        Self::new(cat_id, Role::Assistant, content, now_millis)
    }

    /// Whether this message belongs to `cat_id`'s conversation (`None` = global).
    pub fn is_in(&self, cat_id: Option<&str>) -> bool {
        self.cat_id.as_deref() == cat_id
    }
}

impl Record for ChatMessage {
    const COLLECTION: &'static str = "chat-history";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for ChatMessage {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// A saved AI conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub cat_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Conversation {
    pub fn new(cat_id: Option<&str>, title: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.map(str::to_string),
            title: title.into(),
            messages: Vec::new(),
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Append a message and bump `updated_at`.
    pub fn push(&mut self, message: ChatMessage) {
        self.updated_at = self.updated_at.max(message.timestamp);
        self.messages.push(message);
    }
}

impl Record for Conversation {
    const COLLECTION: &'static str = "ai-conversations";

    fn id(&self) -> &str {
        &self.id
    }
}
