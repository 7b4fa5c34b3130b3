//! Chat session shared between the widget and the responder.

use std::sync::Arc;

use m360_core::chat::{ChatMessage, ChatSession};
use tokio::sync::Mutex;
use tracing::debug;

use crate::responder::Responder;

/// Owns one conversation. Cloning shares the same session.
#[derive(Clone)]
pub struct ChatService {
    session: Arc<Mutex<ChatSession>>,
    responder: Arc<Responder>,
}

impl ChatService {
    pub fn new(responder: Responder) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::new())),
            responder: Arc::new(responder),
        }
    }

    /// Sends a visitor message and returns the bot's answer.
    ///
    /// Returns `None` for blank input or while a previous reply is still
    /// being produced. The session lock is released during generation.
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let history = {
            let mut session = self.session.lock().await;
            if session.is_typing {
                debug!("Reply pending, ignoring input");
                return None;
            }
            let history = session.messages().to_vec();
            session.push(ChatMessage::user(text));
            session.is_typing = true;
            history
        };

        let reply = self.responder.respond(text, &history).await;
        let message = ChatMessage::from_reply(reply);

        let mut session = self.session.lock().await;
        session.push(message.clone());
        session.is_typing = false;
        Some(message)
    }

    /// Resets the conversation to the single "welcome back" greeting.
    pub async fn clear(&self) {
        self.session.lock().await.clear();
    }

    pub async fn open(&self) {
        self.session.lock().await.is_open = true;
    }

    pub async fn close(&self) {
        self.session.lock().await.is_open = false;
    }

    /// Flips the open flag and returns the new value.
    pub async fn toggle(&self) -> bool {
        let mut session = self.session.lock().await;
        session.is_open = !session.is_open;
        session.is_open
    }

    pub async fn is_open(&self) -> bool {
        self.session.lock().await.is_open
    }

    pub async fn is_typing(&self) -> bool {
        self.session.lock().await.is_typing
    }

    /// Snapshot of the conversation.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.lock().await.messages().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m360_core::chat::session::CLEARED_GREETING;
    use m360_core::chat::{MessageType, Sender};
    use m360_core::config::ChatSettings;

    fn service() -> ChatService {
        ChatService::new(Responder::new().with_chat_settings(ChatSettings::instant()))
    }

    #[tokio::test]
    async fn test_send_appends_user_and_bot() {
        let service = service();
        let reply = service.send("  Where is Rumtek Monastery?  ").await.unwrap();
        assert_eq!(reply.kind, MessageType::Location);

        let messages = service.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "Where is Rumtek Monastery?");
        assert_eq!(messages[2], reply);
        assert!(!service.is_typing().await);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let service = service();
        assert!(service.send("   ").await.is_none());
        assert_eq!(service.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_uses_prior_history() {
        let service = service();
        service.send("Where is Rumtek Monastery?").await.unwrap();
        let reply = service.send("yes").await.unwrap();
        assert_eq!(reply.kind, MessageType::Location);
        assert_eq!(reply.metadata_str("action"), Some("navigate_to_map"));
    }

    #[tokio::test]
    async fn test_clear_and_visibility() {
        let service = service();
        service.send("hello").await.unwrap();
        service.clear().await;
        let messages = service.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, CLEARED_GREETING);

        assert!(!service.is_open().await);
        assert!(service.toggle().await);
        service.close().await;
        assert!(!service.is_open().await);
        service.open().await;
        assert!(service.is_open().await);
    }
}
