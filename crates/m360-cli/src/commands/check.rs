use anyhow::Result;
use colored::Colorize;
use m360_core::config::ConnectivitySettings;
use m360_interaction::{ConnectivityChecker, ConnectivityStatus};

pub async fn run(settings: &ConnectivitySettings) -> Result<()> {
    let checker = ConnectivityChecker::new(settings)?;
    match checker.check().await {
        ConnectivityStatus::Ok => println!("{} {}", "API OK".green(), checker.endpoint()),
        ConnectivityStatus::Error(reason) => {
            println!("{} {}", "API unreachable".red(), checker.endpoint());
            println!("  {reason}");
            println!(
                "  {}",
                format!("The site retries every {}s.", settings.retry_secs).bright_black()
            );
        }
        ConnectivityStatus::Checking => println!("{}", "Checking…".yellow()),
    }
    Ok(())
}
