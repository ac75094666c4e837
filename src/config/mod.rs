// src/config/mod.rs
//
// Resolver Configuration
//
// Defaults -> JSON file -> environment overrides.
// Nothing deployment-specific is ever defaulted: the candidate directory
// list starts empty and must be supplied by the operator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const CONFIG_PATH_ENV: &str = "DROPBRIDGE_CONFIG";
pub const CANDIDATE_DIRS_ENV: &str = "DROPBRIDGE_CANDIDATE_DIRS";
pub const ACCEPTED_EXTENSIONS_ENV: &str = "DROPBRIDGE_ACCEPTED_EXTENSIONS";
pub const BOUNDARY_TIMEOUT_ENV: &str = "DROPBRIDGE_BOUNDARY_TIMEOUT_MS";
pub const HANDSHAKE_GRACE_ENV: &str = "DROPBRIDGE_HANDSHAKE_GRACE_MS";
pub const BACKEND_URL_ENV: &str = "DROPBRIDGE_BACKEND_URL";

const DEFAULT_BOUNDARY_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_HANDSHAKE_GRACE_MS: u64 = 5_000;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:63080";

// ============================================================================
// CANDIDATE DIRECTORY LIST
// ============================================================================

/// Ordered fallback search roots. Earlier entries win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateDirectoryList(Vec<String>);

impl CandidateDirectoryList {
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            dirs.into_iter()
                .map(Into::into)
                .filter(|dir: &String| !dir.trim().is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// RESOLVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub candidate_dirs: CandidateDirectoryList,
    /// Empty means every extension is accepted
    pub accepted_extensions: Vec<String>,
    pub boundary_timeout_ms: u64,
    pub handshake_grace_ms: u64,
    pub analysis_backend_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_dirs: CandidateDirectoryList::default(),
            accepted_extensions: Vec::new(),
            boundary_timeout_ms: DEFAULT_BOUNDARY_TIMEOUT_MS,
            handshake_grace_ms: DEFAULT_HANDSHAKE_GRACE_MS,
            analysis_backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load from the process environment and the config file it points at
    pub fn load() -> AppResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();

        let mut config = match Self::config_path(&lookup) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                log::info!("[CONFIG] No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup)?;
        log::info!(
            "[CONFIG] {} candidate directories, boundary timeout {}ms",
            config.candidate_dirs.len(),
            config.boundary_timeout_ms
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// `$DROPBRIDGE_CONFIG`, else `<config dir>/dropbridge/config.json`
    fn config_path(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        lookup(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("dropbridge").join("config.json")))
    }

    /// Apply environment-style overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dirs) = lookup(CANDIDATE_DIRS_ENV) {
            self.candidate_dirs = CandidateDirectoryList::new(
                std::env::split_paths(&dirs).map(|p| p.to_string_lossy().into_owned()),
            );
        }

        if let Some(extensions) = lookup(ACCEPTED_EXTENSIONS_ENV) {
            self.accepted_extensions = extensions
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(timeout) = lookup(BOUNDARY_TIMEOUT_ENV) {
            self.boundary_timeout_ms = timeout.trim().parse()?;
        }

        if let Some(grace) = lookup(HANDSHAKE_GRACE_ENV) {
            self.handshake_grace_ms = grace.trim().parse()?;
        }

        if let Some(url) = lookup(BACKEND_URL_ENV) {
            self.analysis_backend_url = url.trim().trim_end_matches('/').to_string();
        }

        Ok(())
    }

    pub fn boundary_timeout(&self) -> Duration {
        Duration::from_millis(self.boundary_timeout_ms)
    }

    pub fn handshake_grace(&self) -> Duration {
        Duration::from_millis(self.handshake_grace_ms)
    }
}
