// src/application/commands/mod.rs
//
// Tauri Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between UI and AppState
// - Commands accept DTOs, return DTOs or ResolutionOutcome
// - Commands handle error conversion for Tauri
// - Commands NEVER contain resolution logic

pub mod drop_commands;

pub use drop_commands::*;
