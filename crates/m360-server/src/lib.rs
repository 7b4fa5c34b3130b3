//! Mock REST API used during development.
//!
//! | Route              | Response                          |
//! |--------------------|-----------------------------------|
//! | `GET /`, `/health` | plain-text banner                 |
//! | `GET /api/health`  | `"ok"`                            |
//! | `GET /api/monasteries` | fixed monastery directory     |
//! | `GET /api/events`  | events dated relative to today    |

use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use m360_core::config::ServerSettings;
use m360_core::knowledge::{EventRecord, MonasteryRecord, monastery_directory, upcoming_events};
use tokio::net::TcpListener;
use tracing::info;

pub const BANNER: &str = "Monastery360 Backend is running";

pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/health", get(|| async { BANNER }))
        .route("/api/health", get(|| async { Json("ok") }))
        .route("/api/monasteries", get(list_monasteries))
        .route("/api/events", get(list_events))
}

async fn list_monasteries() -> Json<Vec<MonasteryRecord>> {
    Json(monastery_directory())
}

async fn list_events() -> Json<Vec<EventRecord>> {
    Json(upcoming_events(Local::now().date_naive()))
}

/// Binds `host:port` from the settings and serves until the task is dropped.
pub async fn serve(settings: &ServerSettings) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr).await?;
    serve_on(listener).await
}

/// Serves on an already bound listener.
pub async fn serve_on(listener: TcpListener) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Mock API listening");
    axum::serve(listener, router()).await?;
    Ok(())
}
