use async_trait::async_trait;
use m360_core::chat::ChatMessage;

use crate::error::GenerativeError;

/// A remote text generator the responder may consult before the rules.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns the raw model output for `message` given the prior
    /// `history` (which does not include `message`).
    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String, GenerativeError>;
}
