//! Orchestrator - horizon loop over simulated years
//!
//! See `engine.rs` for the loop and `manifest.rs` for run fingerprints.

pub mod engine;
pub mod manifest;

// Re-export main types for convenience
pub use engine::{
    run_projection, run_projection_with, ProjectionConfig, ProjectionEngine, ProjectionError,
    ProjectionOutcome, ProjectionPhase, YearResult, DEFAULT_HORIZON_YEARS,
};

pub use manifest::{compute_events_digest, compute_input_hash, RunManifest};
