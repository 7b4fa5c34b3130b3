//! Reply production: the generative backend first, the rule engine always
//! as the fallback.

use std::sync::Arc;
use std::time::Duration;

use m360_core::chat::{BotReply, ChatMessage, ReplySource, RuleEngine, parse_structured_reply};
use m360_core::config::{AppConfig, ChatSettings};
use rand::Rng;
use tracing::{debug, warn};

use crate::backend::GenerativeBackend;
use crate::error::GenerativeError;
use crate::gemini_api_agent::GeminiApiAgent;

pub struct Responder {
    backend: Option<Arc<dyn GenerativeBackend>>,
    rules: RuleEngine,
    chat: ChatSettings,
    ai_debug: bool,
}

impl Responder {
    /// Rules-only responder with default chat settings.
    pub fn new() -> Self {
        Self {
            backend: None,
            rules: RuleEngine::default(),
            chat: ChatSettings::default(),
            ai_debug: false,
        }
    }

    /// Builds a responder from configuration. Gemini is wired in only when a
    /// usable key is present.
    pub fn from_config(config: &AppConfig) -> Self {
        let responder = Self::new()
            .with_chat_settings(config.chat.clone())
            .with_ai_debug(config.debug.ai_debug);
        match config.usable_gemini() {
            Some(settings) => responder.with_backend(Arc::new(GeminiApiAgent::from_settings(settings))),
            None => responder,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn GenerativeBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_chat_settings(mut self, chat: ChatSettings) -> Self {
        self.chat = chat;
        self
    }

    /// Logs backend failures at `warn` instead of `debug`.
    pub fn with_ai_debug(mut self, enabled: bool) -> Self {
        self.ai_debug = enabled;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Asks the generative backend and parses its structured reply.
    pub async fn try_generative(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<BotReply, GenerativeError> {
        let backend = self.backend.as_ref().ok_or(GenerativeError::NotConfigured)?;
        let raw = backend.generate(message, history).await?;
        let reply = parse_structured_reply(&raw)?;
        debug!(backend = backend.name(), kind = %reply.kind, "Generative reply accepted");
        Ok(reply.with_source(ReplySource::Gemini))
    }

    /// Produces a reply. Never fails: any backend problem falls through to
    /// the rule engine after the thinking delay.
    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> BotReply {
        match self.try_generative(message, history).await {
            Ok(reply) => return reply,
            Err(GenerativeError::NotConfigured) => {}
            Err(err) if self.ai_debug => warn!("Gemini unavailable, using rules: {err}"),
            Err(err) => debug!("Gemini unavailable, using rules: {err}"),
        }

        let delay = self.thinking_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.rules.respond(message, history)
    }

    fn thinking_delay(&self) -> Duration {
        let (min, max) = self.chat.thinking_delay_bounds();
        if min == max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use m360_core::chat::MessageType;

    struct Canned(Result<String, GenerativeError>);

    #[async_trait]
    impl GenerativeBackend for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _: &str, _: &[ChatMessage]) -> Result<String, GenerativeError> {
            self.0.clone()
        }
    }

    fn responder(result: Result<String, GenerativeError>) -> Responder {
        Responder::new()
            .with_chat_settings(ChatSettings::instant())
            .with_backend(Arc::new(Canned(result)))
    }

    #[tokio::test]
    async fn test_generative_reply_wins() {
        let reply = responder(Ok(r#"{"type":"etiquette","text":"Remove shoes"}"#.into()))
            .respond("Where is Rumtek?", &[])
            .await;
        assert_eq!(reply.kind, MessageType::Etiquette);
        assert_eq!(reply.source(), Some("gemini"));
    }

    #[tokio::test]
    async fn test_http_error_falls_back_to_rules() {
        let reply = responder(Err(GenerativeError::Http {
            status: 500,
            message: "boom".into(),
        }))
        .respond("Where is Rumtek?", &[])
        .await;
        assert_eq!(reply.kind, MessageType::Location);
        assert_eq!(reply.source(), Some("rules"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let reply = responder(Ok("I am not JSON".into()))
            .respond("hotels near tawang", &[])
            .await;
        assert_eq!(reply.kind, MessageType::Hotel);
    }

    #[tokio::test]
    async fn test_no_backend_is_not_configured() {
        let responder = Responder::new().with_chat_settings(ChatSettings::instant());
        assert!(!responder.has_backend());
        assert_eq!(
            responder.try_generative("hi", &[]).await,
            Err(GenerativeError::NotConfigured)
        );
    }

    #[test]
    fn test_placeholder_key_means_rules_only() {
        let mut config = AppConfig::default();
        config.gemini = Some(m360_core::config::GeminiSettings {
            api_key: "your_api_key_here".into(),
            model: "gemini-1.5-flash".into(),
            base_url: None,
        });
        assert!(!Responder::from_config(&config).has_backend());
    }

    #[test]
    fn test_thinking_delay_within_bounds() {
        let responder = Responder::new();
        for _ in 0..20 {
            let delay = responder.thinking_delay();
            assert!(delay >= Duration::from_millis(1000) && delay <= Duration::from_millis(2000));
        }
        let instant = Responder::new().with_chat_settings(ChatSettings::instant());
        assert_eq!(instant.thinking_delay(), Duration::ZERO);
    }
}
