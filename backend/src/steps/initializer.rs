//! State initializer
//!
//! Builds the run's roster from the snapshot: filters to participating
//! statuses and assigns each employee a post and track by matching their
//! original (grade, designation) against the catalog.
//!
//! An employee with no matching post is not an error. They fall back to
//! `PostAssignment::Unassigned` on the general track, which keeps them out of
//! every candidate pool while still letting them retire.

use crate::catalog::PostCatalog;
use crate::models::employee::{CareerState, Employee, PostAssignment, Track};
use crate::models::roster::{Roster, RosterMember};
use tracing::{debug, warn};

/// Counts describing how a roster was initialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSummary {
    /// Employees kept (status Regular or Prl)
    pub num_participating: usize,

    /// Employees dropped for any other status
    pub num_excluded: usize,

    /// Participating employees with no matching post
    pub num_unassigned: usize,
}

/// Create the initial career state of one employee
pub fn initial_state(employee: &Employee, catalog: &PostCatalog) -> CareerState {
    let (post, track) = match catalog.find_by_grade(employee.grade_no, employee.desg_no) {
        Some(post) => (PostAssignment::Assigned(post.seq_no), post.track),
        None => (PostAssignment::Unassigned, Track::General),
    };
    CareerState::new(employee.grade_no, post, track, employee.tenure_anchor())
}

/// Build the run roster from a snapshot
///
/// # Example
///
/// ```rust
/// use promotion_projection_core::catalog::PostCatalog;
/// use promotion_projection_core::steps::initializer::initialize_roster;
///
/// let catalog = PostCatalog::new(Vec::new()).unwrap();
/// let (roster, summary) = initialize_roster(Vec::new(), &catalog);
/// assert!(roster.is_empty());
/// assert_eq!(summary.num_unassigned, 0);
/// ```
pub fn initialize_roster(employees: Vec<Employee>, catalog: &PostCatalog) -> (Roster, InitSummary) {
    let mut summary = InitSummary::default();
    let mut members = Vec::with_capacity(employees.len());

    for employee in employees {
        if !employee.status.participates() {
            summary.num_excluded += 1;
            continue;
        }

        let state = initial_state(&employee, catalog);
        if state.post() == PostAssignment::Unassigned {
            debug!(
                emp_id = %employee.emp_id,
                grade_no = employee.grade_no,
                desg_no = employee.desg_no,
                "no catalog post for employee; left unassigned"
            );
            summary.num_unassigned += 1;
        }
        members.push(RosterMember { employee, state });
    }

    summary.num_participating = members.len();
    if summary.num_unassigned > 0 {
        warn!(
            unassigned = summary.num_unassigned,
            "employees without a matching post will never be promoted"
        );
    }

    (Roster::new(members), summary)
}
