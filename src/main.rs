// src/main.rs

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use std::sync::Arc;

use tauri::{DragDropEvent, Emitter, Manager, WindowEvent};

use dropbridge::application::commands::*;
use dropbridge::application::state::AppState;
use dropbridge::boundary::handshake;
use dropbridge::config::ResolverConfig;
use dropbridge::events::{BridgeEvent, NotificationBridge};
use dropbridge::integrations::HttpAnalysisClient;
use dropbridge::services::{basename, FsPathVerifier};
use dropbridge::DropDescriptor;

const DROP_EVENT: &str = "dropbridge://drop";
const OUTCOME_EVENT: &str = "dropbridge://outcome";
const NATIVE_SOURCE_TAG: &str = "native-window";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. CONFIGURATION
    let config = ResolverConfig::load()?;
    log::info!(
        "Loaded config: {} candidate directories, backend {}",
        config.candidate_dirs.len(),
        config.analysis_backend_url
    );

    // 2. INFRASTRUCTURE
    let bridge = Arc::new(NotificationBridge::new());
    let analysis = Arc::new(HttpAnalysisClient::new(config.analysis_backend_url.clone())?);
    let (ready, waiter) = handshake();
    let grace = config.handshake_grace();

    // 3. APPLICATION STATE
    let app_state = AppState::new(config, Arc::new(FsPathVerifier), Arc::clone(&bridge), analysis, ready);

    // 4. TAURI BOOTSTRAP
    let shutdown_bridge = Arc::clone(&bridge);
    tauri::Builder::default()
        .manage(app_state)
        .setup(move |app| {
            // Forward host events to the webview once it reports ready
            let handle = app.handle().clone();
            let forwarding_bridge = Arc::clone(&bridge);
            tauri::async_runtime::spawn(async move {
                forwarding_bridge
                    .install_forwarder_when_ready(waiter, grace, move |event| {
                        match event {
                            BridgeEvent::Drop(notification) => handle.emit(DROP_EVENT, notification)?,
                            BridgeEvent::Outcome(outcome) => handle.emit(OUTCOME_EVENT, outcome)?,
                        }
                        Ok(())
                    })
                    .await;
            });
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::DragDrop(DragDropEvent::Drop { paths, .. }) = event {
                let state = window.state::<AppState>().inner().clone();
                for path in paths {
                    let raw_path = path.to_string_lossy().to_string();
                    let descriptor = DropDescriptor::new(basename(&raw_path), NATIVE_SOURCE_TAG)
                        .with_raw_path(raw_path);
                    let state = state.clone();
                    tauri::async_runtime::spawn(async move {
                        state.resolve_descriptor(descriptor).await;
                    });
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            resolve_drop,
            boundary_ready,
            analyze_resolved_path,
            analyze_drop,
            candidate_directories,
        ])
        .run(tauri::generate_context!())?;

    shutdown_bridge.shutdown();
    Ok(())
}
