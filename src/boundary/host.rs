// src/boundary/host.rs
//
// Host-side half of the resolution round-trip.
//
// For each call: publish the drop notification, run the engine on the
// blocking pool (existence checks are blocking), publish the outcome, reply.
// Calls are independent and processed concurrently.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::boundary::client::boundary_failure;
use crate::boundary::messages::{CallReceiver, Envelope, ResolveCall};
use crate::domain::{DropDescriptor, ResolutionOutcome};
use crate::events::{DropNotification, NotificationBridge};
use crate::services::ResolutionEngine;

#[derive(Clone)]
pub struct HostEndpoint {
    engine: Arc<ResolutionEngine>,
    bridge: Arc<NotificationBridge>,
}

impl HostEndpoint {
    pub fn new(engine: Arc<ResolutionEngine>, bridge: Arc<NotificationBridge>) -> Self {
        Self { engine, bridge }
    }

    pub fn bridge(&self) -> &Arc<NotificationBridge> {
        &self.bridge
    }

    /// Resolve one descriptor and fan out both notifications on the host bridge
    pub async fn handle(&self, descriptor: DropDescriptor) -> ResolutionOutcome {
        self.bridge.publish_drop(DropNotification::from(&descriptor));

        let engine = Arc::clone(&self.engine);
        let task_descriptor = descriptor.clone();
        let outcome = match tokio::task::spawn_blocking(move || engine.resolve(&task_descriptor)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("[HOST] Resolution task failed: {}", e);
                boundary_failure(&descriptor, format!("resolution task failed: {}", e))
            }
        };

        self.bridge.publish_outcome(outcome.clone());
        outcome
    }

    async fn serve(&self, call: ResolveCall) {
        let ResolveCall {
            request_id,
            request,
            reply,
        } = call;

        let outcome = match request.open::<DropDescriptor>() {
            Ok(descriptor) => self.handle(descriptor).await,
            Err(e) => {
                log::warn!("[HOST] Request {} not decodable: {}", request_id, e);
                let unknown = DropDescriptor::new("", "boundary");
                boundary_failure(&unknown, format!("request not decodable: {}", e))
            }
        };

        let envelope = match Envelope::seal(&outcome) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::error!("[HOST] Outcome for {} not encodable: {}", request_id, e);
                return;
            }
        };

        if reply.send(envelope).is_err() {
            log::warn!("[HOST] Caller for {} stopped waiting", request_id);
        }
    }

    /// Serve calls until every sender is dropped
    pub fn spawn(self, mut calls: CallReceiver) -> JoinHandle<()> {
        tokio::spawn(async move {
            log::info!("[HOST] Endpoint started");
            while let Some(call) = calls.recv().await {
                let endpoint = self.clone();
                tokio::spawn(async move { endpoint.serve(call).await });
            }
            log::info!("[HOST] Endpoint stopped: no callers left");
        })
    }
}
