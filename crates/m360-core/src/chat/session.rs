//! Chat session state.
//!
//! Holds what the chat widget needs between turns: the message history,
//! whether the window is open, and whether a reply is being computed.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// First message of every new session.
pub const WELCOME_GREETING: &str = "🙏 **Namaste! Welcome to Monastery360**\n\n\
I'm your personal AI monastery guide, here to give you authentic, context-aware assistance.\n\n\
🎯 **My Expertise:**\n\
🏛️ **Sacred Sites** - Detailed monastery information\n\
🗺️ **Smart Navigation** - Location services\n\
🏨 **Accommodation** - Curated hotel recommendations\n\
🎥 **Virtual Reality** - Immersive 360° experiences\n\
👨‍🏫 **Local Experts** - Connect with verified guides\n\
📅 **Travel Planning** - Personalized itineraries\n\n\
What spiritual journey can I help you plan today?";

/// Message left after the history is cleared.
pub const CLEARED_GREETING: &str =
    "🙏 Welcome back! How can I help you explore the world of monasteries today?";

/// Conversation state for one visitor.
///
/// The history is append-only; the only way to drop messages is
/// [`ChatSession::clear`], which resets it to a single greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pub is_open: bool,
    pub is_typing: bool,
}

impl ChatSession {
    /// Starts a session containing the welcome greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::bot_text(WELCOME_GREETING)],
            is_open: false,
            is_typing: false,
        }
    }

    /// The full history, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a message to the history.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Resets the history to exactly one bot greeting.
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::bot_text(CLEARED_GREETING)];
        self.is_typing = false;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.len(), 1);
        assert!(session.messages()[0].is_bot());
        assert!(session.messages()[0].text.contains("Namaste"));
        assert!(!session.is_open);
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut session = ChatSession::new();
        session.push(ChatMessage::user("first"));
        session.push(ChatMessage::bot_text("second"));
        let texts: Vec<_> = session.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(&texts[1..], &["first", "second"]);
        assert!(session.messages()[2].is_bot());
    }

    #[test]
    fn test_clear_leaves_single_greeting() {
        let mut session = ChatSession::new();
        session.push(ChatMessage::user("hello"));
        session.push(ChatMessage::bot_text("hi"));
        session.is_typing = true;

        session.clear();

        assert_eq!(session.len(), 1);
        assert!(session.messages()[0].is_bot());
        assert_eq!(session.messages()[0].text, CLEARED_GREETING);
        assert!(!session.is_typing);
    }
}
