// src/services/fallback_resolver.rs
//
// Fallback Resolver
//
// Bounded, ordered probe of the configured candidate directories.
// Not a crawl: each pass joins one key onto each directory, left to right,
// and the first existing path wins.
//
// Pass 1 joins the requested key (the relative candidate, or the dropped
// file's name); pass 2 joins the basename of the original candidate.
// Pass 2 is skipped when it would repeat pass 1's probes.

use std::sync::Arc;

use crate::config::CandidateDirectoryList;
use crate::domain::{DropDescriptor, ResolutionStage, ResolutionTrail};
use crate::services::descriptor_normalizer::{basename, NormalizedCandidate, PathStyle};
use crate::services::path_verifier::{PathVerifier, Verification};

/// Where a fallback match came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMatch {
    pub path: String,
    pub pass: u8,
    pub directory_index: usize,
}

pub struct FallbackResolver {
    verifier: Arc<dyn PathVerifier>,
    style: PathStyle,
}

impl FallbackResolver {
    pub fn new(verifier: Arc<dyn PathVerifier>, style: PathStyle) -> Self {
        Self { verifier, style }
    }

    /// Single ordered scan: first directory containing `key` wins.
    pub fn search(
        &self,
        key: &str,
        candidate_dirs: &CandidateDirectoryList,
        trail: &mut ResolutionTrail,
    ) -> Option<(usize, String)> {
        for (index, dir) in candidate_dirs.iter().enumerate() {
            let probe = self.style.join(dir, key);
            match self.verifier.check(&probe) {
                Verification::Present => {
                    trail.record(ResolutionStage::Search, format!("probe '{}': found", probe));
                    return Some((index, probe));
                }
                Verification::Absent => {
                    trail.record(ResolutionStage::Search, format!("probe '{}': absent", probe));
                }
                Verification::Error(e) => {
                    trail.record(
                        ResolutionStage::Search,
                        format!("probe '{}': VERIFICATION_ERROR ({}), treated as absent", probe, e),
                    );
                }
            }
        }
        None
    }

    /// Two-pass search for a candidate that failed verification.
    pub fn locate(
        &self,
        descriptor: &DropDescriptor,
        candidate: &NormalizedCandidate,
        candidate_dirs: &CandidateDirectoryList,
        trail: &mut ResolutionTrail,
    ) -> Option<FallbackMatch> {
        if candidate_dirs.is_empty() {
            trail.record(ResolutionStage::Search, "no candidate directories configured");
            return None;
        }

        let pass_one_key = self.pass_one_key(descriptor, candidate);
        let pass_two_key = self.pass_two_key(descriptor, candidate);

        if let Some(key) = self.accept_key(pass_one_key.as_deref(), 1, trail) {
            trail.record(
                ResolutionStage::Search,
                format!("pass 1: '{}' across {} directories", key, candidate_dirs.len()),
            );
            if let Some((directory_index, path)) = self.search(key, candidate_dirs, trail) {
                return Some(FallbackMatch { path, pass: 1, directory_index });
            }
        }

        if pass_two_key.is_some() && pass_two_key == pass_one_key {
            trail.record(
                ResolutionStage::Search,
                "pass 2 skipped: basename is identical to the pass 1 key",
            );
            return None;
        }

        if let Some(key) = self.accept_key(pass_two_key.as_deref(), 2, trail) {
            trail.record(
                ResolutionStage::Search,
                format!("pass 2: basename '{}' across {} directories", key, candidate_dirs.len()),
            );
            if let Some((directory_index, path)) = self.search(key, candidate_dirs, trail) {
                return Some(FallbackMatch { path, pass: 2, directory_index });
            }
        }

        None
    }

    /// Full requested filename: a relative candidate as-is, else the dropped name
    fn pass_one_key(&self, descriptor: &DropDescriptor, candidate: &NormalizedCandidate) -> Option<String> {
        if !candidate.is_empty() && !candidate.is_absolute {
            return Some(candidate.path.clone());
        }
        let name = descriptor.name().trim();
        (!name.is_empty()).then(|| self.style.normalize_separators(name))
    }

    fn pass_two_key(&self, descriptor: &DropDescriptor, candidate: &NormalizedCandidate) -> Option<String> {
        let source = if candidate.is_empty() { descriptor.name() } else { candidate.path.as_str() };
        let base = basename(source.trim());
        (!base.is_empty()).then(|| base.to_string())
    }

    /// Keys must stay inside the candidate directories
    fn accept_key<'k>(&self, key: Option<&'k str>, pass: u8, trail: &mut ResolutionTrail) -> Option<&'k str> {
        let key = key?;
        if self.style.is_absolute(key) || key.starts_with(['/', '\\']) {
            trail.record(
                ResolutionStage::Search,
                format!("pass {} key '{}' is absolute, rejected", pass, key),
            );
            return None;
        }
        if key.split(['/', '\\']).any(|component| component == "..") {
            trail.record(
                ResolutionStage::Search,
                format!("pass {} key '{}' escapes the candidate directory, rejected", pass, key),
            );
            return None;
        }
        Some(key)
    }
}
