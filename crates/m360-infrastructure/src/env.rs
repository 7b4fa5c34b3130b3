//! Environment variable overrides and the environment report.

use std::collections::HashMap;

use m360_core::config::{AppConfig, DEFAULT_GEMINI_MODEL, GeminiSettings, is_placeholder};
use serde::Serialize;

pub const GEMINI_API_KEY: &str = "VITE_GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "VITE_GEMINI_MODEL";
pub const GOOGLE_MAPS_API_KEY: &str = "VITE_GOOGLE_MAPS_API_KEY";
pub const AI_DEBUG: &str = "VITE_AI_DEBUG";
pub const FIREBASE_API_KEY: &str = "VITE_FIREBASE_API_KEY";
pub const FIREBASE_AUTH_DOMAIN: &str = "VITE_FIREBASE_AUTH_DOMAIN";
pub const FIREBASE_PROJECT_ID: &str = "VITE_FIREBASE_PROJECT_ID";
pub const FIREBASE_STORAGE_BUCKET: &str = "VITE_FIREBASE_STORAGE_BUCKET";
pub const FIREBASE_MESSAGING_SENDER_ID: &str = "VITE_FIREBASE_MESSAGING_SENDER_ID";
pub const FIREBASE_APP_ID: &str = "VITE_FIREBASE_APP_ID";
pub const LOG_FILTER: &str = "M360_LOG";

/// Variables listed by the environment report, in display order.
pub const REPORTED_VARS: [&str; 10] = [
    GEMINI_API_KEY,
    GEMINI_MODEL,
    GOOGLE_MAPS_API_KEY,
    AI_DEBUG,
    FIREBASE_API_KEY,
    FIREBASE_AUTH_DOMAIN,
    FIREBASE_PROJECT_ID,
    FIREBASE_STORAGE_BUCKET,
    FIREBASE_MESSAGING_SENDER_ID,
    FIREBASE_APP_ID,
];

/// Where variables are read from.
pub trait EnvSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

fn non_empty(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.get(name).filter(|value| !value.trim().is_empty())
}

/// Overlays environment values on top of `config`. Unset or empty
/// variables leave the existing value alone.
pub fn apply_env(config: &mut AppConfig, env: &dyn EnvSource) {
    let key = non_empty(env, GEMINI_API_KEY);
    let model = non_empty(env, GEMINI_MODEL);
    if key.is_some() || model.is_some() {
        let gemini = config.gemini.get_or_insert_with(|| GeminiSettings {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
        });
        if let Some(key) = key {
            gemini.api_key = key;
        }
        if let Some(model) = model {
            gemini.model = model;
        }
    }

    if let Some(key) = non_empty(env, GOOGLE_MAPS_API_KEY) {
        config.maps.api_key = Some(key);
    }

    let firebase = &mut config.firebase;
    for (name, slot) in [
        (FIREBASE_API_KEY, &mut firebase.api_key),
        (FIREBASE_AUTH_DOMAIN, &mut firebase.auth_domain),
        (FIREBASE_PROJECT_ID, &mut firebase.project_id),
        (FIREBASE_STORAGE_BUCKET, &mut firebase.storage_bucket),
        (FIREBASE_MESSAGING_SENDER_ID, &mut firebase.messaging_sender_id),
        (FIREBASE_APP_ID, &mut firebase.app_id),
    ] {
        if let Some(value) = non_empty(env, name) {
            *slot = Some(value);
        }
    }

    if let Some(flag) = non_empty(env, AI_DEBUG) {
        config.debug.ai_debug = flag == "true";
    }
    if let Some(filter) = non_empty(env, LOG_FILTER) {
        config.debug.log_level = filter;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvStatus {
    Set,
    Missing,
    /// Present but still holding a template value.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub name: &'static str,
    pub status: EnvStatus,
}

/// Reports which variables are usable. Values are never included.
pub fn env_report(env: &dyn EnvSource) -> Vec<EnvEntry> {
    REPORTED_VARS
        .iter()
        .map(|&name| {
            let status = match env.get(name) {
                None => EnvStatus::Missing,
                Some(value) if value.trim().is_empty() => EnvStatus::Missing,
                Some(value) if is_placeholder(&value) => EnvStatus::Placeholder,
                Some(_) => EnvStatus::Set,
            };
            EnvEntry { name, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_gemini_key_and_model() {
        let mut config = AppConfig::default();
        apply_env(
            &mut config,
            &env(&[(GEMINI_API_KEY, "abc"), (GEMINI_MODEL, "gemini-pro")]),
        );
        let gemini = config.usable_gemini().unwrap();
        assert_eq!(gemini.api_key, "abc");
        assert_eq!(gemini.model, "gemini-pro");
    }

    #[test]
    fn test_model_without_key_is_not_usable() {
        let mut config = AppConfig::default();
        apply_env(&mut config, &env(&[(GEMINI_MODEL, "gemini-pro")]));
        assert!(config.gemini.is_some());
        assert!(config.usable_gemini().is_none());
    }

    #[test]
    fn test_placeholder_key_degrades() {
        let mut config = AppConfig::default();
        apply_env(&mut config, &env(&[(GEMINI_API_KEY, "your_api_key_here")]));
        assert!(!config.feature_status().generative_chat);
    }

    #[test]
    fn test_empty_values_keep_file_values() {
        let mut config = AppConfig::default();
        config.maps.api_key = Some("from-file".into());
        apply_env(&mut config, &env(&[(GOOGLE_MAPS_API_KEY, "  ")]));
        assert_eq!(config.maps.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_firebase_debug_and_log() {
        let mut config = AppConfig::default();
        apply_env(
            &mut config,
            &env(&[
                (FIREBASE_API_KEY, "k"),
                (FIREBASE_AUTH_DOMAIN, "d"),
                (FIREBASE_APP_ID, "a"),
                (AI_DEBUG, "true"),
                (LOG_FILTER, "m360=debug"),
            ]),
        );
        assert!(config.feature_status().auth);
        assert!(config.debug.ai_debug);
        assert_eq!(config.debug.log_level, "m360=debug");
    }

    #[test]
    fn test_report() {
        let report = env_report(&env(&[
            (GEMINI_API_KEY, "real"),
            (FIREBASE_APP_ID, "your_app_id_here"),
            (GOOGLE_MAPS_API_KEY, ""),
        ]));
        assert_eq!(report.len(), REPORTED_VARS.len());
        let status = |name: &str| report.iter().find(|e| e.name == name).unwrap().status;
        assert_eq!(status(GEMINI_API_KEY), EnvStatus::Set);
        assert_eq!(status(FIREBASE_APP_ID), EnvStatus::Placeholder);
        assert_eq!(status(GOOGLE_MAPS_API_KEY), EnvStatus::Missing);
        assert_eq!(status(FIREBASE_PROJECT_ID), EnvStatus::Missing);
        assert_eq!(EnvStatus::Set.to_string(), "SET");
        assert_eq!(EnvStatus::Missing.to_string(), "MISSING");
        assert_eq!(EnvStatus::Placeholder.to_string(), "PLACEHOLDER");
    }
}
