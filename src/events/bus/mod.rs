// src/events/bus/mod.rs
//
// Notification bridge and its per-kind listener registries

pub mod notification_bridge;
pub mod registry;

pub use notification_bridge::{NotificationBridge, PublishLogEntry};
pub use registry::{Listener, ListenerId, ListenerRegistry, PublishReport, Subscription};
