// src/boundary/messages.rs
//
// Wire messages crossing the isolation boundary.
//
// CRITICAL RULES:
// - Everything crosses as serialized text inside an Envelope
// - No reference to host-side state ever reaches the UI side

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::AppResult;

/// Default number of resolution calls that may queue at the host
pub const CALL_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: String,
}

impl Envelope {
    pub fn seal<T: Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self {
            payload: serde_json::to_string(value)?,
        })
    }

    pub fn open<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// One resolution round-trip: descriptor in, outcome out
#[derive(Debug)]
pub struct ResolveCall {
    pub request_id: Uuid,
    pub request: Envelope,
    pub reply: oneshot::Sender<Envelope>,
}

pub type CallSender = mpsc::Sender<ResolveCall>;
pub type CallReceiver = mpsc::Receiver<ResolveCall>;

pub fn call_channel(capacity: usize) -> (CallSender, CallReceiver) {
    mpsc::channel(capacity.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DropDescriptor;

    #[test]
    fn test_envelope_carries_descriptor_by_value() {
        let descriptor = DropDescriptor::new("scene.usd", "ui").with_url("file:///proj/scene.usd");
        let envelope = Envelope::seal(&descriptor).unwrap();

        assert!(envelope.payload.contains("\"sourceTag\":\"ui\""));
        let opened: DropDescriptor = envelope.open().unwrap();
        assert_eq!(opened, descriptor);
    }

    #[test]
    fn test_open_rejects_garbage() {
        let envelope = Envelope {
            payload: "{not json".to_string(),
        };
        assert!(envelope.open::<DropDescriptor>().is_err());
    }
}
