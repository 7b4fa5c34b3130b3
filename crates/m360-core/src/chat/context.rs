//! Lightweight conversation context used by intent detection.

use super::message::ChatMessage;

/// How many trailing messages are scanned for topics.
const CONTEXT_WINDOW: usize = 3;

/// Topic keywords recognised in recent messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Rumtek,
    Tawang,
    Accommodation,
    GuideServices,
}

impl Topic {
    /// First matching topic for a message, checked in a fixed order.
    fn of(text: &str) -> Option<Topic> {
        let lower = text.to_lowercase();
        if lower.contains("rumtek") {
            Some(Topic::Rumtek)
        } else if lower.contains("tawang") {
            Some(Topic::Tawang)
        } else if lower.contains("hotel") {
            Some(Topic::Accommodation)
        } else if lower.contains("guide") {
            Some(Topic::GuideServices)
        } else {
            None
        }
    }

    pub fn is_monastery(self) -> bool {
        matches!(self, Topic::Rumtek | Topic::Tawang)
    }
}

/// What the recent history says about the current exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    pub recent_topics: Vec<Topic>,
    pub current_topic: Option<Topic>,
    pub is_follow_up: bool,
    pub last_bot_response: String,
}

impl ConversationContext {
    pub fn analyze(history: &[ChatMessage], current_message: &str) -> Self {
        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        let recent_topics = history[start..]
            .iter()
            .filter_map(|msg| Topic::of(&msg.text))
            .collect();

        let current_topic = Topic::of(current_message).filter(|t| t.is_monastery());

        let last_bot_response = history
            .iter()
            .rev()
            .find(|m| m.is_bot())
            .map(|m| m.text.clone())
            .unwrap_or_default();

        Self {
            recent_topics,
            current_topic,
            is_follow_up: !history.is_empty(),
            last_bot_response,
        }
    }

    pub fn mentions_monastery(&self) -> bool {
        self.recent_topics.iter().any(|t| t.is_monastery())
    }

    /// True when the last bot message asked the visitor a yes/no question.
    pub fn offers_follow_up(&self) -> bool {
        self.last_bot_response.contains("Would you like")
    }

    /// An affirmative answer is only meaningful after a monastery topic or
    /// an explicit offer from the bot.
    pub fn awaits_confirmation(&self) -> bool {
        self.mentions_monastery() || self.offers_follow_up()
    }
}
