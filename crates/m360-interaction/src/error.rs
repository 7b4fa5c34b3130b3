//! Errors raised while talking to the generative backend.
//!
//! None of these reach the visitor: the responder logs them and answers
//! from the rule engine instead.

use m360_core::chat::ReplyParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerativeError {
    /// No usable API key is configured.
    #[error("Generative backend is not configured")]
    NotConfigured,

    /// The request never produced an HTTP response.
    #[error("Gemini API request failed: {message}")]
    Request { message: String },

    /// The backend answered with a non-success status.
    #[error("Gemini API returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Gemini API returned no text in the response candidates")]
    EmptyResponse,

    #[error("Failed to parse Gemini reply: {0}")]
    Parse(#[from] ReplyParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let http = GenerativeError::Http {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(http.to_string(), "Gemini API returned 503: busy");
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: GenerativeError = ReplyParseError::NoJsonObject.into();
        assert!(matches!(err, GenerativeError::Parse(ReplyParseError::NoJsonObject)));
    }
}
