use colored::Colorize;
use m360_core::config::{AppConfig, MapsSettings};
use m360_infrastructure::{EnvStatus, ProcessEnv, env_report};

pub fn run(config: &AppConfig) {
    println!("{}", "🔍 Environment Variable Check:".bold());
    for entry in env_report(&ProcessEnv) {
        let status = match entry.status {
            EnvStatus::Set => entry.status.to_string().green(),
            EnvStatus::Missing => entry.status.to_string().red(),
            EnvStatus::Placeholder => entry.status.to_string().yellow(),
        };
        println!("  {:<36} {}", entry.name, status);
    }

    let features = config.feature_status();
    println!();
    println!("{}", "Features:".bold());
    println!("  {:<36} {}", "generative chat", on_off(features.generative_chat));
    println!("  {:<36} {}", "map", on_off(features.map));
    println!("  {:<36} {}", "sign-in", on_off(features.auth));
    if !features.map {
        println!("  {}", MapsSettings::MISSING_KEY_NOTICE.bright_black());
    }
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled { "enabled".green() } else { "disabled".bright_black() }
}
