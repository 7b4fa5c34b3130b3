//! Parsing of structured replies returned by the generative backend.
//!
//! The model is asked for a bare JSON object `{type, text, metadata}`, but it
//! regularly wraps the object in prose or a markdown fence. Parsing first
//! tries the whole text, then the outermost `{...}` block.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::message::BotReply;

static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{.*\}").unwrap_or_else(|e| panic!("invalid JSON block pattern: {e}"))
});

/// Why a model response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyParseError {
    #[error("response is empty")]
    Empty,
    #[error("response contains no JSON object")]
    NoJsonObject,
    #[error("JSON object does not match the reply shape: {0}")]
    InvalidShape(String),
}

/// Parses a model response into a [`BotReply`].
///
/// Accepts only objects whose `type` is a known message type and whose
/// `text` is a string. A `null` or missing `metadata` becomes empty.
pub fn parse_structured_reply(raw: &str) -> Result<BotReply, ReplyParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReplyParseError::Empty);
    }

    match parse_shape(trimmed) {
        Ok(reply) => Ok(reply),
        Err(direct_err) => {
            let block = JSON_BLOCK
                .find(trimmed)
                .ok_or(ReplyParseError::NoJsonObject)?;
            if block.as_str() == trimmed {
                return Err(direct_err);
            }
            parse_shape(block.as_str())
        }
    }
}

fn parse_shape(candidate: &str) -> Result<BotReply, ReplyParseError> {
    let mut value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| ReplyParseError::InvalidShape(e.to_string()))?;

    if let Some(obj) = value.as_object_mut() {
        if obj.get("metadata").is_some_and(serde_json::Value::is_null) {
            obj.remove("metadata");
        }
    }

    serde_json::from_value(value).map_err(|e| ReplyParseError::InvalidShape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageType;

    #[test]
    fn test_parses_bare_object() {
        let reply = parse_structured_reply(
            r#"{"type":"location","text":"Here","metadata":{"coordinates":{"lat":1.0,"lng":2.0}}}"#,
        )
        .unwrap();
        assert_eq!(reply.kind, MessageType::Location);
        assert_eq!(reply.text, "Here");
        assert_eq!(reply.metadata["coordinates"]["lng"], 2.0);
    }

    #[test]
    fn test_extracts_object_from_prose_and_fence() {
        let raw = "Sure! Here you go:\n```json\n{\"type\": \"text\", \"text\": \"Namaste\"}\n```\nEnjoy.";
        let reply = parse_structured_reply(raw).unwrap();
        assert_eq!(reply.kind, MessageType::Text);
        assert_eq!(reply.text, "Namaste");
        assert!(reply.metadata.is_empty());
    }

    #[test]
    fn test_null_metadata_is_empty() {
        let reply =
            parse_structured_reply(r#"{"type":"hotel","text":"x","metadata":null}"#).unwrap();
        assert!(reply.metadata.is_empty());
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = parse_structured_reply(r#"{"type":"weather","text":"sunny"}"#).unwrap_err();
        assert!(matches!(err, ReplyParseError::InvalidShape(_)));
    }

    #[test]
    fn test_rejects_non_string_text() {
        assert!(parse_structured_reply(r#"{"type":"text","text":42}"#).is_err());
    }

    #[test]
    fn test_rejects_plain_prose() {
        assert_eq!(
            parse_structured_reply("I cannot answer that."),
            Err(ReplyParseError::NoJsonObject)
        );
        assert_eq!(parse_structured_reply("   "), Err(ReplyParseError::Empty));
    }
}
