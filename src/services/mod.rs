// src/services/mod.rs
//
// Services Module - Resolution Pipeline

pub mod descriptor_normalizer;
pub mod fallback_resolver;
pub mod path_verifier;
pub mod resolution_service;

#[cfg(test)]
mod resolution_service_tests;
#[cfg(test)]
mod resolution_service_hardening_tests;

// Re-export all services and their types
pub use descriptor_normalizer::{
    basename,
    decode_url_path,
    CandidateSource,
    DescriptorNormalizer,
    NormalizedCandidate,
    PathStyle,
};

pub use path_verifier::{
    FsPathVerifier,
    PathVerifier,
    Verification,
};

pub use fallback_resolver::{
    FallbackMatch,
    FallbackResolver,
};

pub use resolution_service::ResolutionEngine;
