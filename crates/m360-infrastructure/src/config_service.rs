//! Configuration service implementation.
//!
//! Assembles [`AppConfig`] from built-in defaults, `config.toml`
//! (~/.config/monastery360/config.toml unless overridden) and environment
//! variables, later sources winning.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use m360_core::config::AppConfig;
use tracing::{debug, warn};

use crate::env::{EnvSource, ProcessEnv, apply_env};
use crate::paths::M360Paths;

/// Configuration service that loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; the platform default is used when `None`.
    path: Option<PathBuf>,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses `path` instead of the platform config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it if not cached. Load failures are
    /// logged and replaced by defaults plus environment values.
    pub fn get_config(&self) -> AppConfig {
        self.try_get_config().unwrap_or_else(|e| {
            warn!("Failed to load configuration, using defaults: {e:#}");
            self.use_defaults()
        })
    }

    /// Gets the configuration, loading it if not cached. A failed load is
    /// returned to the caller and nothing is cached.
    pub fn try_get_config(&self) -> Result<AppConfig> {
        if let Some(cached) = self.config.read().ok().and_then(|lock| lock.clone()) {
            return Ok(cached);
        }
        let loaded = self.load()?;
        self.store(&loaded);
        Ok(loaded)
    }

    /// Caches and returns defaults overlaid with the process environment,
    /// ignoring the config file.
    pub fn use_defaults(&self) -> AppConfig {
        let mut config = AppConfig::default();
        apply_env(&mut config, &ProcessEnv);
        self.store(&config);
        config
    }

    fn store(&self, config: &AppConfig) {
        if let Ok(mut lock) = self.config.write() {
            *lock = Some(config.clone());
        }
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut lock) = self.config.write() {
            *lock = None;
        }
    }

    /// Loads from the configured file and the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        let path = match &self.path {
            Some(path) => Some(path.clone()),
            None => M360Paths::config_file().ok(),
        };
        load_config(path.as_deref(), &ProcessEnv)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `path` (a missing file means defaults) and overlays `env`.
pub fn load_config(path: Option<&Path>, env: &dyn EnvSource) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading config file");
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        Some(path) => {
            debug!(path = %path.display(), "No config file, using defaults");
            AppConfig::default()
        }
        None => AppConfig::default(),
    };
    apply_env(&mut config, env);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let no_env: HashMap<String, String> = HashMap::new();
        let config = load_config(Some(&dir.path().join("config.toml")), &no_env).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[gemini]\napi_key = \"file-key\"\nmodel = \"gemini-pro\"\n\n[server]\nport = 8081\n",
        )
        .unwrap();

        let env: HashMap<String, String> =
            [("VITE_GEMINI_API_KEY".to_string(), "env-key".to_string())].into();
        let config = load_config(Some(&path), &env).unwrap();

        let gemini = config.usable_gemini().unwrap();
        assert_eq!(gemini.api_key, "env-key");
        assert_eq!(gemini.model, "gemini-pro");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let no_env: HashMap<String, String> = HashMap::new();
        let err = load_config(Some(&path), &no_env).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_gemini_table_without_key_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gemini]\nmodel = \"gemini-pro\"\n\n[server]\nport = 8081\n")
            .unwrap();
        let no_env: HashMap<String, String> = HashMap::new();
        let config = load_config(Some(&path), &no_env).unwrap();
        assert_eq!(config.gemini.as_ref().unwrap().model, "gemini-pro");
        assert_eq!(config.server.port, 8081);
        assert!(!config.feature_status().generative_chat);
    }

    #[test]
    fn test_service_reports_invalid_file_then_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let service = ConfigService::with_path(&path);
        let err = service.try_get_config().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));

        let config = service.use_defaults();
        assert_eq!(config.server, AppConfig::default().server);
        assert_eq!(service.try_get_config().unwrap(), config);
    }

    #[test]
    fn test_service_caches_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\nthinking_delay_min_ms = 5\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().chat.thinking_delay_min_ms, 5);

        std::fs::write(&path, "[chat]\nthinking_delay_min_ms = 7\n").unwrap();
        assert_eq!(service.get_config().chat.thinking_delay_min_ms, 5);

        service.invalidate_cache();
        assert_eq!(service.get_config().chat.thinking_delay_min_ms, 7);
    }
}
