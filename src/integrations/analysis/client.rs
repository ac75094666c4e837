// src/integrations/analysis/client.rs
//
// Analysis Backend Integration
//
// ARCHITECTURE:
// - HTTP client for the local analysis service
// - POST {base}/analyze_path with form field `file_path`
// - The JSON reply is returned as-is (interpretation belongs to the UI)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Only successfully resolved paths are ever sent

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::domain::{DomainError, ResolutionOutcome};
use crate::error::{AppError, AppResult};

const ANALYZE_ENDPOINT: &str = "analyze_path";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze_path(&self, path: &str) -> AppResult<serde_json::Value>;
}

/// Analysis backend client
pub struct HttpAnalysisClient {
    base_url: String,
    http_client: Client,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, ANALYZE_ENDPOINT)
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze_path(&self, path: &str) -> AppResult<serde_json::Value> {
        log::info!("[ANALYSIS] Requesting analysis of {}", path);

        let response = self
            .http_client
            .post(self.endpoint())
            .header(header::ACCEPT, "application/json")
            .form(&[("file_path", path)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Backend { status });
        }

        Ok(response.json().await?)
    }
}

/// Hand a resolved outcome to the backend; failed outcomes are refused
pub async fn analyze_outcome(
    backend: &dyn AnalysisBackend,
    outcome: &ResolutionOutcome,
) -> AppResult<serde_json::Value> {
    match outcome.resolved_path() {
        Some(path) if outcome.is_success() => backend.analyze_path(path).await,
        _ => Err(AppError::Domain(DomainError::InvariantViolation(format!(
            "Cannot analyze an unresolved drop: {}",
            outcome.message().unwrap_or("no resolved path")
        )))),
    }
}
