// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above the resolution engine and the notification bridge
// - Provides the boundary between the desktop shell (Tauri) and services
// - Translates between DTOs and domain values

pub mod dto;
pub mod error_handling;
pub mod state;

#[cfg(feature = "desktop")]
pub mod commands;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;

#[cfg(feature = "desktop")]
pub use commands::*;
