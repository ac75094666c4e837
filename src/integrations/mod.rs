// src/integrations/mod.rs
//
// External Integrations Module
//
// The analysis backend receives a resolved path as a single string field.
// Its reply is passed through uninterpreted.

pub mod analysis;

pub use analysis::{analyze_outcome, AnalysisBackend, HttpAnalysisClient};
