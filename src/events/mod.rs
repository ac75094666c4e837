// src/events/mod.rs
//
// Cross-Boundary Notification Bridge - Public API
//
// CRITICAL: listeners are only reachable through a Subscription;
// the registries themselves are never handed out.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod bus;
pub mod types;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

pub use types::{BridgeEvent, DropNotification, ListenerKind};

pub use bus::{ListenerId, NotificationBridge, PublishLogEntry, PublishReport, Subscription};
