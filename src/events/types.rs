// src/events/types.rs
//
// Events carried by the notification bridge.
// Each event is an immutable fact; listeners receive shared references and
// cannot mutate what they were given.

use serde::{Deserialize, Serialize};

use crate::domain::{DropDescriptor, ResolutionOutcome};

// ============================================================================
// LISTENER KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    /// Raw drop notifications, before resolution
    DropEvent,
    /// Terminal resolution outcomes
    ResolutionOutcome,
}

impl std::fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerKind::DropEvent => write!(f, "drop_event"),
            ListenerKind::ResolutionOutcome => write!(f, "resolution_outcome"),
        }
    }
}

// ============================================================================
// DROP NOTIFICATION
// ============================================================================

/// Drop notification as it crosses the boundary: `{ path?, name, url?, source }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
}

impl From<&DropDescriptor> for DropNotification {
    fn from(descriptor: &DropDescriptor) -> Self {
        Self {
            path: descriptor
                .raw_path()
                .or(descriptor.relative_path())
                .map(str::to_string),
            name: descriptor.name().to_string(),
            url: descriptor.url().map(str::to_string),
            source: descriptor.source_tag().to_string(),
        }
    }
}

// ============================================================================
// BRIDGE EVENT
// ============================================================================

/// Anything the bridge can publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum BridgeEvent {
    Drop(DropNotification),
    Outcome(ResolutionOutcome),
}

impl BridgeEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            BridgeEvent::Drop(_) => ListenerKind::DropEvent,
            BridgeEvent::Outcome(_) => ListenerKind::ResolutionOutcome,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            BridgeEvent::Drop(_) => "DropNotification",
            BridgeEvent::Outcome(_) => "ResolutionOutcome",
        }
    }
}
