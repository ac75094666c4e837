// src/boundary/ui_context.rs
//
// UI side of the isolation boundary.
//
// Owns its own NotificationBridge. Drop events and outcomes published on the
// host arrive here only through the forwarder installed after the ready
// handshake, as serialized envelopes.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::boundary::client::BoundaryClient;
use crate::boundary::handshake::ReadySignal;
use crate::boundary::messages::Envelope;
use crate::domain::{DropDescriptor, ResolutionOutcome};
use crate::events::{BridgeEvent, DropNotification, NotificationBridge, Subscription};

pub struct UiContext {
    bridge: Arc<NotificationBridge>,
    client: BoundaryClient,
    ready: Mutex<Option<ReadySignal>>,
}

impl UiContext {
    pub fn new(client: BoundaryClient, ready: ReadySignal) -> Self {
        Self {
            bridge: Arc::new(NotificationBridge::new()),
            client,
            ready: Mutex::new(Some(ready)),
        }
    }

    pub fn bridge(&self) -> &Arc<NotificationBridge> {
        &self.bridge
    }

    pub fn on_drop_event<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&DropNotification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bridge.on_drop_event(callback)
    }

    pub fn on_resolution_outcome<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResolutionOutcome) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bridge.on_resolution_outcome(callback)
    }

    /// Tell the host this context is listening. Only the first call signals.
    pub fn signal_ready(&self) -> bool {
        let signal = self.ready.lock().unwrap_or_else(PoisonError::into_inner).take();
        match signal {
            Some(signal) => {
                let delivered = signal.signal();
                log::info!("[UI] Ready signal sent (host waiting: {})", delivered);
                delivered
            }
            None => false,
        }
    }

    /// Round-trip one descriptor to the host
    pub async fn resolve(&self, descriptor: &DropDescriptor) -> ResolutionOutcome {
        self.client.request_resolution(descriptor).await
    }

    /// Publish forwarded host events on this side until the host goes away
    pub(crate) fn spawn_event_pump(&self, mut events: mpsc::UnboundedReceiver<Envelope>) -> JoinHandle<()> {
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            while let Some(envelope) = events.recv().await {
                match envelope.open::<BridgeEvent>() {
                    Ok(event) => {
                        bridge.publish(&event);
                    }
                    Err(e) => log::warn!("[UI] Dropped undecodable event: {}", e),
                }
            }
            log::debug!("[UI] Event pump stopped");
        })
    }
}
