// src/domain/resolution/mod.rs
//
// Resolution Domain
//
// Value objects describing the outcome of resolving a drop descriptor.
//
// CRITICAL RULES:
// - All types are pure value objects (immutable once published)
// - No filesystem access (that's the verifier's job)
// - No event emission (that's the bridge's job)

pub mod state;
pub mod value_objects;

pub use state::ResolutionState;
pub use value_objects::{
    ResolutionErrorKind, ResolutionOutcome, ResolutionStage, ResolutionStep, ResolutionTrail,
};
