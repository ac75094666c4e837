// src/lib.rs
// DropBridge - drag-and-drop path resolution across an isolation boundary
//
// Architecture:
// - Domain-centric: descriptors, outcomes and the resolution state machine live in `domain`
// - Pipeline: normalizer -> verifier -> fallback resolver, driven by the resolution engine
// - Event-driven: outcomes fan out through the notification bridge
// - Explicit boundary: UI and host exchange serialized envelopes only
// - Application Layer: desktop shell commands (feature `desktop`)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod services;

// ============================================================================
// BOUNDARY & APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod boundary;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_descriptor,
    // Drop
    DropDescriptor,
    // Resolution
    ResolutionErrorKind,
    ResolutionOutcome,
    ResolutionStage,
    ResolutionState,
    ResolutionStep,
    ResolutionTrail,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{CandidateDirectoryList, ResolverConfig};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    BridgeEvent,
    DropNotification,
    ListenerKind,
    NotificationBridge,
    PublishLogEntry,
    PublishReport,
    Subscription,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    DescriptorNormalizer,
    FallbackResolver,
    FsPathVerifier,
    PathStyle,
    PathVerifier,
    ResolutionEngine,
    Verification,
};

// ============================================================================
// PUBLIC API - Boundary
// ============================================================================

pub use boundary::{
    connect,
    handshake,
    BoundaryClient,
    BoundaryConnection,
    HandshakeOutcome,
    HostEndpoint,
    UiContext,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};
pub use integrations::{analyze_outcome, AnalysisBackend, HttpAnalysisClient};
