//! Application configuration model.
//!
//! The values here are assembled by `m360-infrastructure` from built-in
//! defaults, `config.toml`, and environment variables. Every external
//! credential is optional: a missing key degrades the matching feature
//! instead of aborting.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini model used by the chatbot.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Values shipped in `.env.example` files that must be treated as unset.
const PLACEHOLDER_VALUES: &[&str] = &[
    "your_api_key_here",
    "your_sender_id_here",
    "your_app_id_here",
];

/// Returns true when `value` is empty or one of the template placeholders.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDER_VALUES.contains(&trimmed)
}

/// Root configuration structure (`config.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: Option<GeminiSettings>,
    pub maps: MapsSettings,
    pub firebase: FirebaseSettings,
    pub debug: DebugSettings,
    pub chat: ChatSettings,
    pub viewer: ViewerSettings,
    pub server: ServerSettings,
    pub connectivity: ConnectivitySettings,
}

impl AppConfig {
    /// Returns the Gemini settings only when a usable API key is present.
    pub fn usable_gemini(&self) -> Option<&GeminiSettings> {
        self.gemini
            .as_ref()
            .filter(|settings| !is_placeholder(&settings.api_key))
    }

    /// Reports which optional features are available with this configuration.
    pub fn feature_status(&self) -> FeatureStatus {
        FeatureStatus {
            generative_chat: self.usable_gemini().is_some(),
            map: self
                .maps
                .api_key
                .as_deref()
                .is_some_and(|key| !is_placeholder(key)),
            auth: self.firebase.is_complete(),
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Usually supplied by `VITE_GEMINI_API_KEY`; empty means unset.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Overrides the REST base URL (used by tests and proxies).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

/// Maps provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsSettings {
    pub api_key: Option<String>,
}

impl MapsSettings {
    /// Message shown in place of the map when no key is configured.
    pub const MISSING_KEY_NOTICE: &'static str =
        "Set VITE_GOOGLE_MAPS_API_KEY in .env.local to enable the map";
}

/// Identity provider credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseSettings {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl FirebaseSettings {
    /// Sign-in needs at least the API key, auth domain and app id.
    pub fn is_complete(&self) -> bool {
        [&self.api_key, &self.auth_domain, &self.app_id]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !is_placeholder(v)))
    }
}

/// Debug settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Logs generative-text fallbacks at `warn` instead of `debug`.
    pub ai_debug: bool,
    pub log_level: String,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            ai_debug: false,
            log_level: "info".to_string(),
        }
    }
}

/// Chatbot tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub thinking_delay_min_ms: u64,
    pub thinking_delay_max_ms: u64,
}

impl ChatSettings {
    /// Settings with the artificial delay disabled.
    pub fn instant() -> Self {
        Self {
            thinking_delay_min_ms: 0,
            thinking_delay_max_ms: 0,
        }
    }

    /// Returns the delay bounds, normalised so that `min <= max`.
    pub fn thinking_delay_bounds(&self) -> (Duration, Duration) {
        let min = self.thinking_delay_min_ms.min(self.thinking_delay_max_ms);
        let max = self.thinking_delay_min_ms.max(self.thinking_delay_max_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            thinking_delay_min_ms: 1000,
            thinking_delay_max_ms: 2000,
        }
    }
}

/// 360° viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub load_timeout_secs: u64,
    pub primary_cdn: String,
    pub fallback_cdn: String,
}

impl ViewerSettings {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            load_timeout_secs: 10,
            primary_cdn: "https://aframe.io/releases/1.4.0/aframe.min.js".to_string(),
            fallback_cdn: "https://cdn.jsdelivr.net/npm/aframe@1.4.0/dist/aframe.min.js"
                .to_string(),
        }
    }
}

/// Mock API server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// API health-check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivitySettings {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub retry_secs: u64,
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 5,
            retry_secs: 30,
        }
    }
}

/// Which optional features the current configuration enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub generative_chat: bool,
    pub map: bool,
    pub auth: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chat.thinking_delay_min_ms, 1000);
        assert_eq!(config.viewer.load_timeout(), Duration::from_secs(10));
        assert_eq!(config.connectivity.retry_secs, 30);
    }

    #[test]
    fn test_gemini_model_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [gemini]
            api_key = "abc"
            "#,
        )
        .unwrap();
        let gemini = config.usable_gemini().unwrap();
        assert_eq!(gemini.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_gemini_table_without_key_keeps_other_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [gemini]
            model = "gemini-pro"

            [server]
            port = 8081
            "#,
        )
        .unwrap();
        let gemini = config.gemini.as_ref().unwrap();
        assert_eq!(gemini.model, "gemini-pro");
        assert!(gemini.api_key.is_empty());
        assert!(config.usable_gemini().is_none());
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_placeholder_key_is_not_usable() {
        let config = AppConfig {
            gemini: Some(GeminiSettings {
                api_key: "your_api_key_here".to_string(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: None,
            }),
            ..Default::default()
        };
        assert!(config.usable_gemini().is_none());
        assert!(!config.feature_status().generative_chat);
    }

    #[test]
    fn test_feature_status_reports_map_and_auth() {
        let mut config = AppConfig::default();
        assert_eq!(
            config.feature_status(),
            FeatureStatus {
                generative_chat: false,
                map: false,
                auth: false
            }
        );

        config.maps.api_key = Some("maps-key".into());
        config.firebase.api_key = Some("k".into());
        config.firebase.auth_domain = Some("d".into());
        config.firebase.app_id = Some("a".into());
        let status = config.feature_status();
        assert!(status.map);
        assert!(status.auth);
    }

    #[test]
    fn test_thinking_delay_bounds_are_ordered() {
        let settings = ChatSettings {
            thinking_delay_min_ms: 900,
            thinking_delay_max_ms: 100,
        };
        let (min, max) = settings.thinking_delay_bounds();
        assert!(min <= max);
        assert_eq!(min, Duration::from_millis(100));
    }
}
