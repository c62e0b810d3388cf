//! Promotion Projection Core - Rust Engine
//!
//! Deterministic year-by-year projection of promotions and retirements over
//! an organization's post hierarchy.
//!
//! # Architecture
//!
//! - **core**: Projection calendar (checkpoints, windows, tenure)
//! - **models**: Domain types (Employee, OrganizationalPost, PredictedEvent)
//! - **catalog**: Post catalog and promotion-rule parsing
//! - **steps**: State initializer, retirement step, promotion step
//! - **orchestrator**: Horizon loop and run manifests
//! - **loader**: CSV roster and catalog readers
//! - **persistence**: SQLite prediction store
//! - **reports**: Views derived from the event list
//!
//! # Critical Invariants
//!
//! 1. Same inputs and reference date always give the same event list
//! 2. Posts are processed in ascending sequence number every year
//! 3. Retirements run before promotions within a year
//! 4. A failed run never leaves partial output behind

// Module declarations
pub mod catalog;
pub mod core;
pub mod loader;
pub mod models;
pub mod orchestrator;
pub mod persistence;
pub mod reports;
pub mod steps;

// Re-exports for convenience
pub use catalog::{CatalogError, PostCatalog};
pub use core::calendar::ProjectionCalendar;
pub use loader::LoadError;
pub use models::{
    employee::{CareerState, Employee, EmploymentStatus, PostAssignment, Track},
    event::{EventLog, GradeLabel, PredictedEvent},
    post::{OrganizationalPost, RawPost},
    roster::{Roster, RosterMember},
};
pub use orchestrator::{
    run_projection, run_projection_with, ProjectionConfig, ProjectionEngine, ProjectionError,
    ProjectionOutcome, ProjectionPhase, RunManifest, YearResult,
};
pub use persistence::{PersistenceError, PredictionStore};
pub use reports::{EmployeeSummary, GradePath, PredictionStep, PromotionReport, YearlyCount};
