//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! Sends the guide prompt, the conversation so far and the new message as
//! three user turns, and returns the raw text of the first candidate.

use async_trait::async_trait;
use m360_core::chat::{ChatMessage, Sender};
use m360_core::config::GeminiSettings;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::GenerativeBackend;
use crate::error::GenerativeError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Instructions sent as the first turn of every request.
pub const SYSTEM_PROMPT: &str = "You are Monastery360's AI guide. Reply concisely and helpfully about monasteries.
Always return a single JSON object with fields: type, text, metadata.
Allowed type values: text, location, hotel, virtual_tour, guide_contact, visiting_info, etiquette, itinerary.
metadata should be small and only include keys relevant to the chosen type (e.g., coordinates, hotels[], guides[], action).";

/// Agent implementation that talks to the Gemini HTTP API.
#[derive(Debug, Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_settings(settings: &GeminiSettings) -> Self {
        let agent = Self::new(&settings.api_key, &settings.model);
        match &settings.base_url {
            Some(base_url) => agent.with_base_url(base_url),
            None => agent,
        }
    }

    /// Points the agent at another endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, GenerativeError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerativeError::Request {
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|err| GenerativeError::Request {
                message: format!("Failed to decode Gemini response: {err}"),
            })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiApiAgent {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String, GenerativeError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerativeError::NotConfigured);
        }
        let request = GenerateContentRequest {
            contents: build_contents(message, history),
        };
        self.send_request(&request).await
    }
}

/// Renders the history as `User:`/`Assistant:` lines.
pub fn format_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| {
            let speaker = match m.sender {
                Sender::User => "User",
                Sender::Bot => "Assistant",
            };
            format!("{speaker}: {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_contents(message: &str, history: &[ChatMessage]) -> Vec<Content> {
    [
        SYSTEM_PROMPT.to_string(),
        format_history(history),
        format!("Now reply to: {message}\nReturn ONLY JSON."),
    ]
    .into_iter()
    .map(|text| Content {
        role: "user".to_string(),
        parts: vec![Part { text }],
    })
    .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    pub(crate) role: String,
    pub(crate) parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    pub(crate) text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Joins the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerativeError> {
    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerativeError::EmptyResponse);
    }
    Ok(text)
}

/// Prefers the `status: message` pair of a Gemini error body over the raw text.
fn map_http_error(status: StatusCode, body: String) -> GenerativeError {
    let message = match serde_json::from_str::<ErrorWrapper>(&body) {
        Ok(ErrorWrapper { error }) => match (error.status, error.message) {
            (Some(status_text), Some(msg)) if !status_text.is_empty() => format!("{status_text}: {msg}"),
            (_, Some(msg)) => msg,
            (_, None) => body,
        },
        Err(_) => body,
    };
    GenerativeError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_user_turns() {
        let history = vec![
            ChatMessage::bot_text("Namaste"),
            ChatMessage::user("Where is Rumtek?"),
        ];
        let contents = build_contents("Hotels?", &history);
        assert_eq!(contents.len(), 3);
        assert!(contents.iter().all(|c| c.role == "user"));
        assert_eq!(contents[0].parts[0].text, SYSTEM_PROMPT);
        assert_eq!(
            contents[1].parts[0].text,
            "Assistant: Namaste\nUser: Where is Rumtek?"
        );
        assert_eq!(contents[2].parts[0].text, "Now reply to: Hotels?\nReturn ONLY JSON.");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest {
            contents: build_contents("hi", &[]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][2]["parts"][0]["text"], "Now reply to: hi\nReturn ONLY JSON.");
        assert_eq!(value["contents"][1]["parts"][0]["text"], "");
    }

    #[test]
    fn test_extract_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"type\":"},{"text":"\"text\"}"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), r#"{"type":"text"}"#);
    }

    #[test]
    fn test_extract_empty() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(extract_text_response(response), Err(GenerativeError::EmptyResponse));
    }

    #[test]
    fn test_map_http_error() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string()),
            GenerativeError::Http {
                status: 429,
                message: "RESOURCE_EXHAUSTED: Quota exceeded".into(),
            }
        );
        assert_eq!(
            map_http_error(StatusCode::BAD_REQUEST, r#"{"error":{"message":"bad key"}}"#.into()),
            GenerativeError::Http {
                status: 400,
                message: "bad key".into(),
            }
        );
        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream down".into()).to_string(),
            "Gemini API returned 502: upstream down"
        );
    }

    #[test]
    fn test_settings_base_url() {
        let agent = GeminiApiAgent::from_settings(&GeminiSettings {
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            base_url: Some("http://127.0.0.1:9/models/".into()),
        });
        assert_eq!(agent.base_url, "http://127.0.0.1:9/models");
        assert_eq!(agent.model(), "gemini-1.5-flash");
    }
}
