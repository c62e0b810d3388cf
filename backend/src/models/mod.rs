//! Domain models for the promotion projection

pub mod employee;
pub mod event;
pub mod post;
pub mod roster;

// Re-exports
pub use employee::{CareerState, Employee, EmploymentStatus, PostAssignment, Track};
pub use event::{EventLog, GradeLabel, PredictedEvent};
pub use post::{OrganizationalPost, RawPost};
pub use roster::{Roster, RosterMember};
