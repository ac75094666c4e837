// src/events/bus/notification_bridge.rs
//
// Notification Bridge
//
// Fans drop notifications and resolution outcomes out to every registered
// listener on one side of the isolation boundary.
//
// DESIGN PRINCIPLES:
// 1. Explicit lifecycle - created once at startup, `shutdown` at teardown
// 2. Failure isolation - listener errors/panics are logged, never propagated
// 3. Snapshot publish - concurrent register/dispose never corrupts a publish
// 4. Observable - every publish is logged and kept in a bounded publish log
// 5. Best-effort forwarding - the late-arriving UI forwarder never blocks publish

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::boundary::handshake::{HandshakeOutcome, ReadyWaiter};
use crate::domain::ResolutionOutcome;
use crate::events::bus::registry::{ListenerRegistry, PublishReport, Subscription};
use crate::events::types::{BridgeEvent, DropNotification, ListenerKind};

const PUBLISH_LOG_CAPACITY: usize = 256;

/// A logged publish for debugging and tracing
#[derive(Debug, Clone)]
pub struct PublishLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: DateTime<Utc>,
    pub listener_count: usize,
    pub failed_count: usize,
}

pub struct NotificationBridge {
    drop_listeners: Arc<ListenerRegistry<DropNotification>>,
    outcome_listeners: Arc<ListenerRegistry<ResolutionOutcome>>,
    publish_log: RwLock<VecDeque<PublishLogEntry>>,
    forwarders: Mutex<Vec<Subscription>>,
    closed: AtomicBool,
}

impl NotificationBridge {
    pub fn new() -> Self {
        Self {
            drop_listeners: ListenerRegistry::new(ListenerKind::DropEvent),
            outcome_listeners: ListenerRegistry::new(ListenerKind::ResolutionOutcome),
            publish_log: RwLock::new(VecDeque::new()),
            forwarders: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    pub fn on_drop_event<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&DropNotification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if self.is_closed() {
            return Subscription::inert(ListenerKind::DropEvent);
        }
        self.drop_listeners.register(callback)
    }

    pub fn on_resolution_outcome<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResolutionOutcome) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if self.is_closed() {
            return Subscription::inert(ListenerKind::ResolutionOutcome);
        }
        self.outcome_listeners.register(callback)
    }

    /// Kind-addressed registration; the callback sees the event wrapped in `BridgeEvent`
    pub fn register<F>(&self, kind: ListenerKind, callback: F) -> Subscription
    where
        F: Fn(&BridgeEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        match kind {
            ListenerKind::DropEvent => self.on_drop_event(move |notification| {
                callback(&BridgeEvent::Drop(notification.clone()))
            }),
            ListenerKind::ResolutionOutcome => self.on_resolution_outcome(move |outcome| {
                callback(&BridgeEvent::Outcome(outcome.clone()))
            }),
        }
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        match kind {
            ListenerKind::DropEvent => self.drop_listeners.len(),
            ListenerKind::ResolutionOutcome => self.outcome_listeners.len(),
        }
    }

    // ========================================================================
    // PUBLISH
    // ========================================================================

    pub fn publish(&self, event: &BridgeEvent) -> PublishReport {
        if self.is_closed() {
            log::debug!("[BRIDGE] {} dropped: bridge is shut down", event.event_type());
            return PublishReport::default();
        }

        let report = match event {
            BridgeEvent::Drop(notification) => self.drop_listeners.publish(notification),
            BridgeEvent::Outcome(outcome) => self.outcome_listeners.publish(outcome),
        };

        let entry = PublishLogEntry {
            event_type: event.event_type().to_string(),
            event_id: Uuid::new_v4().to_string(),
            occurred_at: Utc::now(),
            listener_count: report.listener_count(),
            failed_count: report.failed.len(),
        };
        log::info!(
            "[EVENT] {} (id: {}) | {} listeners, {} failed",
            entry.event_type,
            entry.event_id,
            entry.listener_count,
            entry.failed_count
        );

        let mut log = self.publish_log.write().unwrap_or_else(PoisonError::into_inner);
        if log.len() == PUBLISH_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(entry);

        report
    }

    pub fn publish_drop(&self, notification: DropNotification) -> PublishReport {
        self.publish(&BridgeEvent::Drop(notification))
    }

    pub fn publish_outcome(&self, outcome: ResolutionOutcome) -> PublishReport {
        self.publish(&BridgeEvent::Outcome(outcome))
    }

    /// Get the publish log (for debugging)
    pub fn publish_log(&self) -> Vec<PublishLogEntry> {
        self.publish_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_publish_log(&self) {
        self.publish_log.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    // ========================================================================
    // FORWARDING ACROSS THE BOUNDARY
    // ========================================================================

    /// Install `forwarder` for both kinds once the UI context signals ready.
    ///
    /// Bounded by `grace`; on timeout or abandonment nothing is installed.
    /// Publishing keeps working the whole time.
    pub async fn install_forwarder_when_ready<F>(
        &self,
        waiter: ReadyWaiter,
        grace: Duration,
        forwarder: F,
    ) -> HandshakeOutcome
    where
        F: Fn(&BridgeEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let outcome = waiter.wait(grace).await;
        if outcome != HandshakeOutcome::Ready {
            log::warn!("[BRIDGE] Forwarder not installed: handshake {:?}", outcome);
            return outcome;
        }
        if self.is_closed() {
            log::warn!("[BRIDGE] Forwarder not installed: bridge is shut down");
            return outcome;
        }

        let forwarder = Arc::new(forwarder);
        let drop_forwarder = Arc::clone(&forwarder);
        let outcome_forwarder = forwarder;

        let subscriptions = [
            self.register(ListenerKind::DropEvent, move |event| (*drop_forwarder)(event)),
            self.register(ListenerKind::ResolutionOutcome, move |event| (*outcome_forwarder)(event)),
        ];
        self.forwarders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(subscriptions);

        log::info!("[BRIDGE] Forwarder installed after ready handshake");
        outcome
    }

    pub fn forwarder_count(&self) -> usize {
        self.forwarders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|subscription| !subscription.is_disposed())
            .count()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Tear down: drop every listener and refuse new work
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for subscription in self
            .forwarders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            subscription.dispose();
        }
        self.drop_listeners.clear();
        self.outcome_listeners.clear();
        log::info!("[BRIDGE] Shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for NotificationBridge {
    fn default() -> Self {
        Self::new()
    }
}
