// src/boundary/handshake.rs
//
// "Boundary ready" handshake.
//
// The UI context signals once its listeners are installed; the host waits
// for that signal (bounded by a grace period) before installing its
// forwarding callback. No fixed sleep is involved.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeOutcome {
    /// The UI context signalled readiness
    Ready,
    /// Grace period elapsed without a signal
    TimedOut,
    /// The signal side was dropped without signalling
    Abandoned,
}

/// UI-side half: fire once when ready
#[derive(Debug)]
pub struct ReadySignal {
    sender: oneshot::Sender<()>,
}

impl ReadySignal {
    /// Returns false if the host stopped waiting
    pub fn signal(self) -> bool {
        self.sender.send(()).is_ok()
    }
}

/// Host-side half
#[derive(Debug)]
pub struct ReadyWaiter {
    receiver: oneshot::Receiver<()>,
}

impl ReadyWaiter {
    pub async fn wait(self, grace: Duration) -> HandshakeOutcome {
        match tokio::time::timeout(grace, self.receiver).await {
            Ok(Ok(())) => HandshakeOutcome::Ready,
            Ok(Err(_)) => HandshakeOutcome::Abandoned,
            Err(_) => HandshakeOutcome::TimedOut,
        }
    }
}

pub fn handshake() -> (ReadySignal, ReadyWaiter) {
    let (sender, receiver) = oneshot::channel();
    (ReadySignal { sender }, ReadyWaiter { receiver })
}
