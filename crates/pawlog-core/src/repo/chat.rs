//! Chat history and saved AI conversations.

use std::sync::Arc;

use tracing::debug;

use crate::models::{ChatMessage, Conversation};
use crate::store::{Collection, KvStore, StoreResult};

/// Maximum chat messages retained across all conversations.
pub const CHAT_HISTORY_LIMIT: usize = 100;

/// Maximum saved AI conversations.
pub const CONVERSATION_LIMIT: usize = 5;

/// Bounded chat history. The oldest message is evicted first.
pub struct ChatHistoryRepository {
    messages: Collection<ChatMessage>,
}

impl ChatHistoryRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            messages: Collection::new(kv),
        }
    }

    /// Every retained message, oldest first.
    pub fn get_all(&self) -> Vec<ChatMessage> {
        self.messages.get_all()
    }

    /// Messages of one conversation (`None` = global), oldest first.
    pub fn get_by_cat(&self, cat_id: Option<&str>) -> Vec<ChatMessage> {
        self.messages
            .get_all()
            .into_iter()
            .filter(|m| m.is_in(cat_id))
            .collect()
    }

    /// The last `n` messages of one conversation, oldest first.
    pub fn last_turns(&self, cat_id: Option<&str>, n: usize) -> Vec<ChatMessage> {
        let mut messages = self.get_by_cat(cat_id);
        let excess = messages.len().saturating_sub(n);
        messages.drain(..excess);
        messages
    }

    /// Append a message, evicting the oldest beyond [`CHAT_HISTORY_LIMIT`].
    pub fn add(&self, message: ChatMessage) -> StoreResult<()> {
        let mut messages = self.messages.get_all();
        messages.push(message);

        let excess = messages.len().saturating_sub(CHAT_HISTORY_LIMIT);
        if excess > 0 {
            debug!(evicted = excess, "chat history over limit");
            messages.drain(..excess);
        }

        self.messages.replace_all(&messages)
    }

    /// Drop one conversation's messages (`None` = global).
    pub fn clear(&self, cat_id: Option<&str>) -> StoreResult<usize> {
        let mut messages = self.messages.get_all();
        let before = messages.len();
        messages.retain(|m| !m.is_in(cat_id));

        let removed = before - messages.len();
        if removed > 0 {
            self.messages.replace_all(&messages)?;
        }
        Ok(removed)
    }
}

/// Saved AI conversations, keeping only the most recently updated.
pub struct ConversationRepository {
    conversations: Collection<Conversation>,
}

impl ConversationRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            conversations: Collection::new(kv),
        }
    }

    /// Saved conversations, most recently updated first.
    pub fn get_all(&self) -> Vec<Conversation> {
        let mut conversations = self.conversations.get_all();
        conversations.sort_by_key(|c| std::cmp::Reverse(c.updated_at));
        conversations
    }

    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations.get(id)
    }

    /// Insert or replace by id, then keep the [`CONVERSATION_LIMIT`] most recent.
    pub fn save(&self, conversation: Conversation) -> StoreResult<()> {
        let mut conversations = self.conversations.get_all();
        conversations.retain(|c| c.id != conversation.id);
        conversations.push(conversation);

        conversations.sort_by_key(|c| std::cmp::Reverse(c.updated_at));
        conversations.truncate(CONVERSATION_LIMIT);

        self.conversations.replace_all(&conversations)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.conversations.delete(id)
    }
}
