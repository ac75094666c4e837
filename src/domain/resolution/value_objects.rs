// src/domain/resolution/value_objects.rs
//
// Resolution Value Objects
//
// Pure, immutable data structures describing how a drop descriptor was
// turned into a host path (or why it could not be).
//
// CRITICAL INVARIANTS:
// - A ResolutionStep is never mutated after it is appended
// - A ResolutionOutcome is terminal: no &mut self methods
// - Exactly one outcome per processed descriptor
// - Clone + Debug + Serialize so outcomes can cross the boundary by value

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RESOLUTION STAGE
// ============================================================================

/// The component that recorded a trail step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    /// Descriptor accepted by the engine
    Received,
    /// Descriptor Normalizer
    Normalize,
    /// Path Verifier
    Verify,
    /// Fallback Resolver
    Search,
    /// Post-resolution checks (accepted extensions)
    Validate,
    /// State machine transition
    Transition,
    /// Cross-boundary transport
    Boundary,
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResolutionStage::Received => "received",
            ResolutionStage::Normalize => "normalize",
            ResolutionStage::Verify => "verify",
            ResolutionStage::Search => "search",
            ResolutionStage::Validate => "validate",
            ResolutionStage::Transition => "transition",
            ResolutionStage::Boundary => "boundary",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// RESOLUTION STEP
// ============================================================================

/// One entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStep {
    pub stage: ResolutionStage,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl ResolutionStep {
    pub fn new(stage: ResolutionStage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only trail builder, owned by whoever is constructing an outcome.
///
/// There is no way to remove or edit a step; `into_steps` hands the
/// sequence over to the outcome.
#[derive(Debug, Default)]
pub struct ResolutionTrail {
    steps: Vec<ResolutionStep>,
}

impl ResolutionTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; every step is mirrored to the debug log
    pub fn record(&mut self, stage: ResolutionStage, detail: impl Into<String>) {
        let step = ResolutionStep::new(stage, detail);
        log::debug!("[RESOLUTION] {}: {}", step.stage, step.detail);
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ResolutionStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<ResolutionStep> {
        self.steps
    }
}

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// Failure kinds carried in a failed outcome's `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionErrorKind {
    /// No usable path-like field in the descriptor
    ExtractionEmpty,
    /// Filesystem access error during an existence check
    VerificationError,
    /// Both fallback passes completed without a match
    SearchExhausted,
    /// Boundary round trip failed or timed out
    BoundaryFailure,
    /// Resolved file has an extension outside the accepted list
    UnsupportedExtension,
}

impl ResolutionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionErrorKind::ExtractionEmpty => "EXTRACTION_EMPTY",
            ResolutionErrorKind::VerificationError => "VERIFICATION_ERROR",
            ResolutionErrorKind::SearchExhausted => "SEARCH_EXHAUSTED",
            ResolutionErrorKind::BoundaryFailure => "BOUNDARY_FAILURE",
            ResolutionErrorKind::UnsupportedExtension => "UNSUPPORTED_EXTENSION",
        }
    }
}

impl std::fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RESOLUTION OUTCOME (TERMINAL)
// ============================================================================

/// The terminal result of resolving one drop descriptor.
///
/// `original_path` holds whatever the normalizer first extracted, even on
/// failure, so the UI can explain what was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolved_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ResolutionErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    trail: Vec<ResolutionStep>,
}

impl ResolutionOutcome {
    /// A verified host path
    pub fn resolved(
        resolved_path: impl Into<String>,
        original_path: Option<String>,
        trail: ResolutionTrail,
    ) -> Self {
        Self {
            success: true,
            resolved_path: Some(resolved_path.into()),
            original_path,
            error: None,
            message: None,
            trail: trail.into_steps(),
        }
    }

    /// A structured failure with a human-readable explanation
    pub fn failed(
        error: ResolutionErrorKind,
        message: impl Into<String>,
        original_path: Option<String>,
        trail: ResolutionTrail,
    ) -> Self {
        Self {
            success: false,
            resolved_path: None,
            original_path,
            error: Some(error),
            message: Some(message.into()),
            trail: trail.into_steps(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn resolved_path(&self) -> Option<&str> {
        self.resolved_path.as_deref()
    }

    pub fn original_path(&self) -> Option<&str> {
        self.original_path.as_deref()
    }

    pub fn error(&self) -> Option<ResolutionErrorKind> {
        self.error
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn trail(&self) -> &[ResolutionStep] {
        &self.trail
    }

    /// Compare everything except the trail (whose timestamps may differ)
    pub fn same_resolution(&self, other: &ResolutionOutcome) -> bool {
        self.success == other.success
            && self.resolved_path == other.resolved_path
            && self.original_path == other.original_path
            && self.error == other.error
    }
}
