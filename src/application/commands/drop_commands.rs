// src/application/commands/drop_commands.rs

use tauri::State;

use crate::application::{
    dto::*,
    error_handling::{ErrorResponse, ToErrorResponse},
    state::AppState,
};
use crate::domain::ResolutionOutcome;

/// Resolve one dropped file reported by the webview
#[tauri::command]
pub async fn resolve_drop(
    descriptor: DropRequestDto,
    state: State<'_, AppState>,
) -> Result<ResolutionOutcome, String> {
    Ok(state.resolve_drop(descriptor).await)
}

/// The webview's listeners are installed; start forwarding host events
#[tauri::command]
pub fn boundary_ready(state: State<'_, AppState>) -> bool {
    state.signal_ready()
}

/// Send a resolved path to the analysis backend
#[tauri::command]
pub async fn analyze_resolved_path(
    path: String,
    state: State<'_, AppState>,
) -> Result<serde_json::Value, String> {
    if path.trim().is_empty() {
        return Err(ErrorResponse::validation("Path must not be empty".to_string()).to_json());
    }
    state.analyze(&path).await.to_error_response()
}

/// Resolve a drop and analyze it in one call; unresolved drops are refused
#[tauri::command]
pub async fn analyze_drop(
    descriptor: DropRequestDto,
    state: State<'_, AppState>,
) -> Result<serde_json::Value, String> {
    state.analyze_drop(descriptor).await.to_error_response()
}

/// Configured fallback search roots, in search order
#[tauri::command]
pub fn candidate_directories(state: State<'_, AppState>) -> CandidateDirectoriesDto {
    state.candidate_directories()
}
