//! Chatbot domain: messages, session state, intent routing and replies.

pub mod context;
pub mod intent;
pub mod message;
pub mod quick_action;
pub mod reply;
pub mod rules;
pub mod session;

pub use context::{ConversationContext, Topic};
pub use intent::{Intent, detect_intent};
pub use message::{BotReply, ChatMessage, MessageType, Metadata, ReplySource, Sender};
pub use quick_action::{QUICK_START_PROMPTS, QuickAction, quick_actions};
pub use reply::{ReplyParseError, parse_structured_reply};
pub use rules::RuleEngine;
pub use session::ChatSession;
