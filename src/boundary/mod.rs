// src/boundary/mod.rs
//
// Isolation Boundary
//
// ARCHITECTURE:
// - UI side: UiContext (own bridge) + BoundaryClient
// - Host side: HostEndpoint (engine + host bridge)
// - Between them: serialized Envelopes over channels, nothing shared by reference
//
// CRITICAL RULES:
// - Round-trips are bounded by the configured boundary timeout
// - Forwarding to the UI starts only after the ready handshake
// - Forwarding is best-effort; it never blocks publishing on the host

pub mod client;
pub mod handshake;
pub mod host;
pub mod messages;
pub mod ui_context;

pub use client::{boundary_failure, BoundaryClient};
pub use handshake::{handshake, HandshakeOutcome, ReadySignal, ReadyWaiter};
pub use host::HostEndpoint;
pub use messages::{call_channel, Envelope, ResolveCall, CALL_QUEUE_CAPACITY};
pub use ui_context::UiContext;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ResolverConfig;
use crate::events::NotificationBridge;
use crate::services::ResolutionEngine;

/// Both sides of an in-process boundary, wired together
pub struct BoundaryConnection {
    pub ui: Arc<UiContext>,
    host_bridge: Arc<NotificationBridge>,
    host_task: JoinHandle<()>,
    pump_task: JoinHandle<()>,
    forwarder_task: Option<JoinHandle<HandshakeOutcome>>,
    handshake_result: Option<HandshakeOutcome>,
}

impl BoundaryConnection {
    pub fn host_bridge(&self) -> &Arc<NotificationBridge> {
        &self.host_bridge
    }

    /// Wait for the forwarder installation to settle
    pub async fn handshake_outcome(&mut self) -> HandshakeOutcome {
        if let Some(outcome) = self.handshake_result {
            return outcome;
        }
        let outcome = match self.forwarder_task.take() {
            Some(task) => task.await.unwrap_or(HandshakeOutcome::Abandoned),
            None => HandshakeOutcome::Abandoned,
        };
        self.handshake_result = Some(outcome);
        outcome
    }

    /// Stop both sides; the host bridge itself is left to its owner
    pub fn shutdown(self) {
        self.ui.bridge().shutdown();
        if let Some(task) = self.forwarder_task {
            task.abort();
        }
        self.pump_task.abort();
        self.host_task.abort();
        log::info!("[BOUNDARY] Connection shut down");
    }
}

/// Wire a UI context to a host endpoint inside this process.
///
/// Must be called from within a tokio runtime.
pub fn connect(
    engine: Arc<ResolutionEngine>,
    host_bridge: Arc<NotificationBridge>,
    config: &ResolverConfig,
) -> BoundaryConnection {
    let (calls, call_receiver) = call_channel(CALL_QUEUE_CAPACITY);
    let host_task = HostEndpoint::new(engine, Arc::clone(&host_bridge)).spawn(call_receiver);

    let (ready, waiter) = handshake();
    let ui = Arc::new(UiContext::new(
        BoundaryClient::new(calls, config.boundary_timeout()),
        ready,
    ));

    let (event_sender, event_receiver) = mpsc::unbounded_channel::<Envelope>();
    let pump_task = ui.spawn_event_pump(event_receiver);

    let forwarding_bridge = Arc::clone(&host_bridge);
    let grace = config.handshake_grace();
    let forwarder_task = tokio::spawn(async move {
        forwarding_bridge
            .install_forwarder_when_ready(waiter, grace, move |event| {
                let envelope = Envelope::seal(event)?;
                event_sender
                    .send(envelope)
                    .map_err(|_| anyhow::anyhow!("UI context is gone"))
            })
            .await
    });

    log::info!(
        "[BOUNDARY] Connected (timeout {}ms, handshake grace {}ms)",
        config.boundary_timeout().as_millis(),
        grace.as_millis()
    );

    BoundaryConnection {
        ui,
        host_bridge,
        host_task,
        pump_task,
        forwarder_task: Some(forwarder_task),
        handshake_result: None,
    }
}
