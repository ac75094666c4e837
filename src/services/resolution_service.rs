// src/services/resolution_service.rs
//
// Resolution Engine
//
// Normalizer -> Verifier -> Fallback Resolver, with a full audit trail.
//
// CRITICAL RULES:
// - Exactly one ResolutionOutcome per descriptor
// - Never returns Err and never panics on descriptor content
// - Stages run strictly in state-machine order
// - Deterministic: same descriptor + same filesystem -> same outcome
//   (trail timestamps aside)
// - Read-only: the engine never creates, moves or deletes files

use std::sync::Arc;

use crate::config::{CandidateDirectoryList, ResolverConfig};
use crate::domain::{
    validate_descriptor, DropDescriptor, ResolutionErrorKind, ResolutionOutcome, ResolutionStage,
    ResolutionState, ResolutionTrail,
};
use crate::services::descriptor_normalizer::{DescriptorNormalizer, NormalizedCandidate, PathStyle};
use crate::services::fallback_resolver::FallbackResolver;
use crate::services::path_verifier::{PathVerifier, Verification};

// ============================================================================
// RESOLUTION RUN (per-descriptor state)
// ============================================================================

/// Mutable state of one resolution; lives only inside `resolve`.
struct ResolutionRun {
    state: ResolutionState,
    trail: ResolutionTrail,
}

impl ResolutionRun {
    fn new() -> Self {
        Self {
            state: ResolutionState::Received,
            trail: ResolutionTrail::new(),
        }
    }

    fn advance(&mut self, next: ResolutionState) {
        match self.state.transition(next) {
            Ok(state) => {
                self.trail.record(
                    ResolutionStage::Transition,
                    format!("{} -> {}", self.state, state),
                );
                self.state = state;
            }
            Err(e) => {
                // Unreachable through `resolve`; recorded rather than panicking.
                log::error!("[RESOLUTION] {}", e);
                self.trail.record(ResolutionStage::Transition, e.to_string());
            }
        }
    }
}

// ============================================================================
// RESOLUTION ENGINE
// ============================================================================

pub struct ResolutionEngine {
    normalizer: DescriptorNormalizer,
    verifier: Arc<dyn PathVerifier>,
    fallback: FallbackResolver,
    candidate_dirs: CandidateDirectoryList,
    accepted_extensions: Vec<String>,
}

impl ResolutionEngine {
    pub fn new(
        verifier: Arc<dyn PathVerifier>,
        candidate_dirs: CandidateDirectoryList,
        style: PathStyle,
    ) -> Self {
        Self {
            normalizer: DescriptorNormalizer::new(style),
            fallback: FallbackResolver::new(Arc::clone(&verifier), style),
            verifier,
            candidate_dirs,
            accepted_extensions: Vec::new(),
        }
    }

    /// Engine for the native platform, configured from `ResolverConfig`
    pub fn from_config(config: &ResolverConfig, verifier: Arc<dyn PathVerifier>) -> Self {
        Self::new(verifier, config.candidate_dirs.clone(), PathStyle::native())
            .with_accepted_extensions(config.accepted_extensions.clone())
    }

    /// Restrict successful resolutions to these extensions (case-insensitive, dot optional)
    pub fn with_accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn candidate_dirs(&self) -> &CandidateDirectoryList {
        &self.candidate_dirs
    }

    /// Resolve one descriptor to a terminal outcome
    pub fn resolve(&self, descriptor: &DropDescriptor) -> ResolutionOutcome {
        let mut run = ResolutionRun::new();
        run.trail.record(
            ResolutionStage::Received,
            format!(
                "descriptor '{}' from '{}' (rawPath: {}, url: {}, relativePath: {})",
                descriptor.name(),
                descriptor.source_tag(),
                descriptor.raw_path().is_some(),
                descriptor.url().is_some(),
                descriptor.relative_path().is_some(),
            ),
        );
        if let Err(e) = validate_descriptor(descriptor) {
            run.trail.record(ResolutionStage::Received, format!("{}; continuing", e));
        }

        // RECEIVED -> NORMALIZED
        let candidate = self.normalizer.normalize(descriptor, &mut run.trail);
        run.advance(ResolutionState::Normalized);
        let original_path = (!candidate.is_empty()).then(|| candidate.path.clone());

        // NORMALIZED -> VERIFIED_PRESENT | VERIFIED_ABSENT
        if self.verify_candidate(&candidate, &mut run.trail) {
            run.advance(ResolutionState::VerifiedPresent);
            log::info!("[RESOLUTION] {} resolved directly", candidate.path);
            return self.finish_success(candidate.path.clone(), original_path, run);
        }
        run.advance(ResolutionState::VerifiedAbsent);

        // VERIFIED_ABSENT -> SEARCHED -> FOUND | NOT_FOUND
        let found = self
            .fallback
            .locate(descriptor, &candidate, &self.candidate_dirs, &mut run.trail);
        run.advance(ResolutionState::Searched);

        match found {
            Some(found) => {
                run.advance(ResolutionState::Found);
                log::info!(
                    "[RESOLUTION] {} found in candidate directory #{} (pass {})",
                    found.path,
                    found.directory_index,
                    found.pass
                );
                self.finish_success(found.path, original_path, run)
            }
            None => {
                run.advance(ResolutionState::NotFound);
                let (kind, message) = self.not_found_reason(&candidate);
                log::warn!("[RESOLUTION] {}: {}", kind, message);
                ResolutionOutcome::failed(kind, message, original_path, run.trail)
            }
        }
    }

    fn verify_candidate(&self, candidate: &NormalizedCandidate, trail: &mut ResolutionTrail) -> bool {
        if candidate.is_empty() {
            trail.record(ResolutionStage::Verify, "empty candidate, treated as absent");
            return false;
        }
        if !candidate.is_absolute {
            trail.record(
                ResolutionStage::Verify,
                format!("'{}' is relative, not checked against the working directory", candidate.path),
            );
            return false;
        }

        match self.verifier.check(&candidate.path) {
            Verification::Present => {
                trail.record(ResolutionStage::Verify, format!("'{}' exists", candidate.path));
                true
            }
            Verification::Absent => {
                trail.record(ResolutionStage::Verify, format!("'{}' does not exist", candidate.path));
                false
            }
            Verification::Error(e) => {
                trail.record(
                    ResolutionStage::Verify,
                    format!(
                        "{}: '{}' could not be checked ({}), treated as absent",
                        ResolutionErrorKind::VerificationError,
                        candidate.path,
                        e
                    ),
                );
                false
            }
        }
    }

    fn finish_success(
        &self,
        resolved: String,
        original_path: Option<String>,
        mut run: ResolutionRun,
    ) -> ResolutionOutcome {
        if let Some(extension) = self.rejected_extension(&resolved) {
            let message = format!(
                "'{}' has unsupported extension '{}' (accepted: {})",
                resolved,
                extension,
                self.accepted_extensions.join(", ")
            );
            run.trail.record(ResolutionStage::Validate, message.clone());
            run.advance(ResolutionState::Rejected);
            return ResolutionOutcome::failed(
                ResolutionErrorKind::UnsupportedExtension,
                message,
                original_path,
                run.trail,
            );
        }

        ResolutionOutcome::resolved(resolved, original_path, run.trail)
    }

    fn rejected_extension(&self, path: &str) -> Option<String> {
        if self.accepted_extensions.is_empty() {
            return None;
        }

        let name = crate::services::descriptor_normalizer::basename(path);
        let extension = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => String::new(),
        };

        (!self.accepted_extensions.contains(&extension)).then_some(extension)
    }

    fn not_found_reason(&self, candidate: &NormalizedCandidate) -> (ResolutionErrorKind, String) {
        if candidate.is_empty() {
            return (
                ResolutionErrorKind::ExtractionEmpty,
                "The dropped item carried no usable name, path or file url".to_string(),
            );
        }

        (
            ResolutionErrorKind::SearchExhausted,
            format!(
                "'{}' does not exist and was not found in {} candidate directories",
                candidate.path,
                self.candidate_dirs.len()
            ),
        )
    }
}
