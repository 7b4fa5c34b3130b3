pub mod config_service;
pub mod env;
pub mod paths;

pub use config_service::{ConfigService, load_config};
pub use env::{EnvEntry, EnvSource, EnvStatus, ProcessEnv, apply_env, env_report};
pub use paths::M360Paths;
