//! Backend API reachability.
//!
//! A check fetches `/api/monasteries` and requires a success status with a
//! JSON body. The monitor repeats failed checks until one succeeds.

use std::time::Duration;

use m360_core::config::ConnectivitySettings;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ConnectivityStatus {
    Checking,
    Ok,
    Error(String),
}

impl ConnectivityStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectivityChecker {
    client: Client,
    base_url: String,
    retry: Duration,
}

impl ConnectivityChecker {
    pub fn new(settings: &ConnectivitySettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            retry: Duration::from_secs(settings.retry_secs),
        })
    }

    pub fn with_retry(mut self, retry: Duration) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/monasteries", self.base_url)
    }

    /// Runs one check.
    pub async fn check(&self) -> ConnectivityStatus {
        match self.probe().await {
            Ok(()) => ConnectivityStatus::Ok,
            Err(reason) => ConnectivityStatus::Error(reason),
        }
    }

    async fn probe(&self) -> Result<(), String> {
        let response = self
            .client
            .get(self.endpoint())
            .send()
            .await
            .map_err(|e| format!("API connection error: {e}"))?;
        if !response.status().is_success() {
            return Err(format!("API responded with status: {}", response.status().as_u16()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map(|_| ())
            .map_err(|e| format!("API returned invalid JSON: {e}"))
    }

    /// Spawns a task that checks until the API is reachable, publishing each
    /// result. Failed checks are retried after the retry interval.
    pub fn spawn_monitor(self) -> (watch::Receiver<ConnectivityStatus>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(ConnectivityStatus::Checking);
        let handle = tokio::spawn(async move {
            loop {
                let status = self.check().await;
                let ok = status.is_ok();
                match &status {
                    ConnectivityStatus::Error(reason) => {
                        warn!(retry_in = ?self.retry, "{reason}");
                    }
                    _ => info!(endpoint = %self.endpoint(), "API reachable"),
                }
                if tx.send(status).is_err() || ok {
                    break;
                }
                tokio::time::sleep(self.retry).await;
            }
        });
        (rx, handle)
    }
}
