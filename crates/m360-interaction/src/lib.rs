//! Network-facing services: the Gemini agent, the reply pipeline, the chat
//! session service and the API connectivity monitor.

pub mod backend;
pub mod chat_service;
pub mod connectivity;
pub mod error;
pub mod gemini_api_agent;
pub mod responder;

pub use backend::GenerativeBackend;
pub use chat_service::ChatService;
pub use connectivity::{ConnectivityChecker, ConnectivityStatus};
pub use error::GenerativeError;
pub use gemini_api_agent::GeminiApiAgent;
pub use responder::Responder;
