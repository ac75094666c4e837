// src/integrations/analysis/mod.rs

pub mod client;

pub use client::{analyze_outcome, AnalysisBackend, HttpAnalysisClient};
