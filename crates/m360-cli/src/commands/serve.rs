use anyhow::Result;
use colored::Colorize;
use m360_core::config::ServerSettings;

pub async fn run(settings: &ServerSettings) -> Result<()> {
    println!(
        "{} Mock API running at {}",
        "✓".green(),
        format!("http://{}:{}", settings.host, settings.port).bright_blue()
    );
    m360_server::serve(settings).await
}
