use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use m360_infrastructure::ConfigService;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "m360")]
#[command(about = "Monastery360 - monastery guide chatbot and 360° tour tools", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/monastery360/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the monastery guide
    Chat,
    /// Ask one question and print the reply as JSON
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Simulate presenting a tour video
    Tour {
        /// Video path, e.g. "/assets/videos/inside monestry.mkv"
        path: String,
        /// Treat the video as 360° footage
        #[arg(long)]
        is360: bool,
        /// Use manual sphere rendering instead of the scene engine
        #[arg(long)]
        sphere: bool,
        /// Make loading fail to exercise the error path
        #[arg(long)]
        simulate_failure: bool,
    },
    /// Run the mock REST API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve a client route
    Route { path: String },
    /// Check whether the API is reachable
    Check {
        /// Base URL of the API
        #[arg(long)]
        url: Option<String>,
    },
    /// Show which environment variables are configured
    Env,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("M360_LOG")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let loaded = config_service.try_get_config();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => config_service.use_defaults(),
    };
    init_tracing(&config.debug.log_level);
    if let Err(e) = loaded {
        warn!("Failed to load configuration, using defaults: {e:#}");
    }

    match cli.command {
        Commands::Chat => commands::chat::run(&config).await?,
        Commands::Ask { text } => commands::ask::run(&config, &text.join(" ")).await?,
        Commands::Tour {
            path,
            is360,
            sphere,
            simulate_failure,
        } => commands::tour::run(
            &config.viewer,
            commands::tour::TourOptions {
                path,
                is_360: is360,
                sphere,
                simulate_failure,
            },
        )?,
        Commands::Serve { port } => {
            let mut settings = config.server.clone();
            if let Some(port) = port {
                settings.port = port;
            }
            commands::serve::run(&settings).await?
        }
        Commands::Route { path } => commands::route::run(&path),
        Commands::Check { url } => {
            let mut settings = config.connectivity.clone();
            if let Some(url) = url {
                settings.api_base_url = url;
            }
            commands::check::run(&settings).await?
        }
        Commands::Env => commands::env::run(&config),
    }

    Ok(())
}
