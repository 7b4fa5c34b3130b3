//! Chat message types.
//!
//! This module contains types for representing messages exchanged with the
//! chatbot, including the sender, the reply category and free-form metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Free-form key/value data attached to a message.
pub type Metadata = Map<String, Value>;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Message typed by the visitor.
    User,
    /// Message produced by the chatbot.
    Bot,
}

/// The category of a message, which decides how it is rendered and which
/// quick actions it offers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Location,
    Hotel,
    VirtualTour,
    GuideContact,
    VisitingInfo,
    Etiquette,
    Itinerary,
}

/// A single message in the chat history.
///
/// Messages are immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Creation time (RFC 3339, UTC).
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>, kind: MessageType, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: chrono::Utc::now().to_rfc3339(),
            kind,
            metadata,
        }
    }

    /// Creates a plain-text message from the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, MessageType::Text, Metadata::new())
    }

    /// Creates a plain-text bot message.
    pub fn bot_text(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text, MessageType::Text, Metadata::new())
    }

    /// Wraps a computed reply into a bot message.
    pub fn from_reply(reply: BotReply) -> Self {
        Self::new(Sender::Bot, reply.text, reply.kind, reply.metadata)
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Reads a string metadata entry.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReplySource {
    Rules,
    Gemini,
}

/// A bot reply before it is stamped with an id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReply {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl BotReply {
    pub fn new(kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MessageType::Text, text)
    }

    /// Adds a metadata entry.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Records which engine produced the reply under `metadata.source`.
    pub fn with_source(self, source: ReplySource) -> Self {
        self.with("source", source.to_string())
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }

    /// Reads `metadata.action`, used by follow-up navigation replies.
    pub fn action(&self) -> Option<&str> {
        self.metadata.get("action").and_then(Value::as_str)
    }
}
