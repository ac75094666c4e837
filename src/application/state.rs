// src/application/state.rs

use std::sync::{Arc, Mutex, PoisonError};

use crate::application::dto::{CandidateDirectoriesDto, DropRequestDto};
use crate::boundary::{boundary_failure, HostEndpoint, ReadySignal};
use crate::config::ResolverConfig;
use crate::domain::{DropDescriptor, ResolutionOutcome};
use crate::error::{AppError, AppResult};
use crate::events::NotificationBridge;
use crate::integrations::{analyze_outcome, AnalysisBackend};
use crate::services::{PathVerifier, ResolutionEngine};

/// Application state managed by the desktop shell.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
/// Built in main.rs and passed here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ResolverConfig>,
    pub bridge: Arc<NotificationBridge>,
    pub host: HostEndpoint,
    pub analysis: Arc<dyn AnalysisBackend>,
    ready: Arc<Mutex<Option<ReadySignal>>>,
}

impl AppState {
    pub fn new(
        config: ResolverConfig,
        verifier: Arc<dyn PathVerifier>,
        bridge: Arc<NotificationBridge>,
        analysis: Arc<dyn AnalysisBackend>,
        ready: ReadySignal,
    ) -> Self {
        let engine = Arc::new(ResolutionEngine::from_config(&config, verifier));
        Self {
            config: Arc::new(config),
            host: HostEndpoint::new(engine, Arc::clone(&bridge)),
            bridge,
            analysis,
            ready: Arc::new(Mutex::new(Some(ready))),
        }
    }

    /// Resolve a webview-reported drop, bounded by the boundary timeout
    pub async fn resolve_drop(&self, request: DropRequestDto) -> ResolutionOutcome {
        self.resolve_descriptor(request.into_descriptor()).await
    }

    pub async fn resolve_descriptor(&self, descriptor: DropDescriptor) -> ResolutionOutcome {
        let timeout = self.config.boundary_timeout();
        match tokio::time::timeout(timeout, self.host.handle(descriptor.clone())).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!("[APP] Resolution of {} timed out", descriptor.name());
                let outcome = boundary_failure(
                    &descriptor,
                    format!("timed out after {}ms", timeout.as_millis()),
                );
                self.bridge.publish_outcome(outcome.clone());
                outcome
            }
        }
    }

    /// Consume the ready signal; later calls report false
    pub fn signal_ready(&self) -> bool {
        let signal = self.ready.lock().unwrap_or_else(PoisonError::into_inner).take();
        signal.map(ReadySignal::signal).unwrap_or(false)
    }

    pub async fn analyze(&self, path: &str) -> AppResult<serde_json::Value> {
        let path = path.trim();
        if path.is_empty() {
            return Err(AppError::Other("Cannot analyze an empty path".to_string()));
        }
        self.analysis.analyze_path(path).await
    }

    /// Resolve a drop and hand the resolved path to the analysis backend
    pub async fn analyze_drop(&self, request: DropRequestDto) -> AppResult<serde_json::Value> {
        let outcome = self.resolve_drop(request).await;
        analyze_outcome(self.analysis.as_ref(), &outcome).await
    }

    pub fn candidate_directories(&self) -> CandidateDirectoriesDto {
        CandidateDirectoriesDto::from(self.config.as_ref())
    }
}
