// src/boundary/client.rs
//
// UI-side half of the resolution round-trip.
//
// CRITICAL RULES:
// - request_resolution always yields a ResolutionOutcome, never an error
// - Enqueueing the call and waiting for the reply share one deadline,
//   the configured boundary timeout
// - A dead host, a dropped reply or an undecodable reply are BOUNDARY_FAILURE

use std::time::Duration;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::boundary::messages::{CallSender, Envelope, ResolveCall};
use crate::domain::{
    DropDescriptor, ResolutionErrorKind, ResolutionOutcome, ResolutionStage, ResolutionTrail,
};

/// Failure outcome for a round-trip that never produced a host outcome
pub fn boundary_failure(descriptor: &DropDescriptor, reason: impl Into<String>) -> ResolutionOutcome {
    let reason = reason.into();
    let mut trail = ResolutionTrail::new();
    trail.record(ResolutionStage::Boundary, reason.clone());

    let original = descriptor
        .raw_path()
        .or(descriptor.url())
        .or(descriptor.relative_path())
        .map(str::to_string);

    ResolutionOutcome::failed(
        ResolutionErrorKind::BoundaryFailure,
        format!("Could not resolve {}: {}", descriptor.name(), reason),
        original,
        trail,
    )
}

#[derive(Debug, Clone)]
pub struct BoundaryClient {
    calls: CallSender,
    timeout: Duration,
}

impl BoundaryClient {
    pub fn new(calls: CallSender, timeout: Duration) -> Self {
        Self { calls, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send the descriptor across the boundary and await the outcome
    pub async fn request_resolution(&self, descriptor: &DropDescriptor) -> ResolutionOutcome {
        let request = match Envelope::seal(descriptor) {
            Ok(envelope) => envelope,
            Err(e) => return boundary_failure(descriptor, format!("request not encodable: {}", e)),
        };

        let request_id = Uuid::new_v4();
        let (reply, reply_rx) = oneshot::channel();
        let call = ResolveCall {
            request_id,
            request,
            reply,
        };

        log::debug!("[BOUNDARY] -> resolve {} ({})", request_id, descriptor.name());

        let exchange = async {
            self.calls
                .send(call)
                .await
                .map_err(|_| "host endpoint is gone")?;
            reply_rx.await.map_err(|_| "host dropped the reply")
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(envelope)) => match envelope.open::<ResolutionOutcome>() {
                Ok(outcome) => {
                    log::debug!(
                        "[BOUNDARY] <- outcome {} (success: {})",
                        request_id,
                        outcome.is_success()
                    );
                    outcome
                }
                Err(e) => boundary_failure(descriptor, format!("reply not decodable: {}", e)),
            },
            Ok(Err(reason)) => {
                log::error!("[BOUNDARY] Request {} failed: {}", request_id, reason);
                boundary_failure(descriptor, reason)
            }
            Err(_) => {
                log::warn!(
                    "[BOUNDARY] Request {} timed out after {}ms",
                    request_id,
                    self.timeout.as_millis()
                );
                boundary_failure(
                    descriptor,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::messages::call_channel;
    use crate::domain::ResolutionTrail;

    fn descriptor() -> DropDescriptor {
        DropDescriptor::new("scene.usd", "ui").with_raw_path("/proj/scene.usd")
    }

    #[tokio::test]
    async fn test_silent_host_times_out_as_boundary_failure() {
        let (calls, _receiver) = call_channel(4);
        let client = BoundaryClient::new(calls, Duration::from_millis(20));

        let outcome = client.request_resolution(&descriptor()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(ResolutionErrorKind::BoundaryFailure));
        assert!(outcome.message().unwrap().contains("timed out after 20ms"));
        assert_eq!(outcome.original_path(), Some("/proj/scene.usd"));
        assert_eq!(outcome.trail()[0].stage, ResolutionStage::Boundary);
    }

    #[tokio::test]
    async fn test_full_call_queue_times_out_as_boundary_failure() {
        let (calls, _receiver) = call_channel(1);
        let client = BoundaryClient::new(calls, Duration::from_millis(20));

        let first = client.request_resolution(&descriptor()).await;
        assert!(first.message().unwrap().contains("timed out after 20ms"));

        // The queue is still full: the host holds the channel but never drains it
        let second = tokio::time::timeout(
            Duration::from_millis(500),
            client.request_resolution(&descriptor()),
        )
        .await
        .expect("request_resolution must settle within its own timeout");

        assert_eq!(second.error(), Some(ResolutionErrorKind::BoundaryFailure));
        assert!(second.message().unwrap().contains("timed out after 20ms"));
    }

    #[tokio::test]
    async fn test_closed_host_is_boundary_failure() {
        let (calls, receiver) = call_channel(4);
        drop(receiver);
        let client = BoundaryClient::new(calls, Duration::from_secs(1));

        let outcome = client.request_resolution(&descriptor()).await;

        assert_eq!(outcome.error(), Some(ResolutionErrorKind::BoundaryFailure));
        assert!(outcome.message().unwrap().contains("host endpoint is gone"));
    }

    #[tokio::test]
    async fn test_dropped_reply_is_boundary_failure() {
        let (calls, mut receiver) = call_channel(4);
        let client = BoundaryClient::new(calls, Duration::from_secs(1));

        tokio::spawn(async move {
            if let Some(call) = receiver.recv().await {
                drop(call.reply);
            }
        });

        let outcome = client.request_resolution(&descriptor()).await;
        assert!(outcome.message().unwrap().contains("dropped the reply"));
    }

    #[tokio::test]
    async fn test_reply_is_decoded() {
        let (calls, mut receiver) = call_channel(4);
        let client = BoundaryClient::new(calls, Duration::from_secs(1));

        tokio::spawn(async move {
            if let Some(call) = receiver.recv().await {
                let request: DropDescriptor = call.request.open().unwrap();
                let outcome = ResolutionOutcome::resolved(
                    request.raw_path().unwrap(),
                    request.raw_path().map(str::to_string),
                    ResolutionTrail::new(),
                );
                let _ = call.reply.send(Envelope::seal(&outcome).unwrap());
            }
        });

        let outcome = client.request_resolution(&descriptor()).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.resolved_path(), Some("/proj/scene.usd"));
    }
}
