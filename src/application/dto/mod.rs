// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Outcomes cross as ResolutionOutcome itself; it is already a value

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::domain::DropDescriptor;

// ============================================================================
// DROP DTOs
// ============================================================================

/// What the webview reports for one dropped file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequestDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub raw_path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub relative_path: Option<String>,
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
}

fn default_source_tag() -> String {
    "webview".to_string()
}

impl DropRequestDto {
    pub fn into_descriptor(self) -> DropDescriptor {
        let mut descriptor = DropDescriptor::new(self.name, self.source_tag);
        if let Some(raw_path) = self.raw_path {
            descriptor = descriptor.with_raw_path(raw_path);
        }
        if let Some(url) = self.url {
            descriptor = descriptor.with_url(url);
        }
        if let Some(relative_path) = self.relative_path {
            descriptor = descriptor.with_relative_path(relative_path);
        }
        descriptor
    }
}

// ============================================================================
// CONFIGURATION DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDirectoriesDto {
    pub directories: Vec<String>,
    pub accepted_extensions: Vec<String>,
}

impl From<&ResolverConfig> for CandidateDirectoriesDto {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            directories: config.candidate_dirs.iter().map(str::to_string).collect(),
            accepted_extensions: config.accepted_extensions.clone(),
        }
    }
}
