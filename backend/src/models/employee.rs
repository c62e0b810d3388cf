//! Employee model
//!
//! An employee carries two kinds of data:
//! - Static facts from the roster snapshot (grade, designation, dates, rank)
//! - Career state that the engine mutates while projecting one run
//!
//! The static facts never change during a run. The career state is created
//! by the state initializer and owned by the roster for the run's duration.
//!
//! # Critical Invariants
//!
//! 1. A retired employee never re-enters a candidate pool
//! 2. Simulated grade numbers only decrease (lower = more senior)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Employment status from the roster
///
/// Only `Regular` and `Prl` (post-retirement leave) employees take part in
/// the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Regular,
    Prl,
    /// Any other status, kept verbatim
    Other(String),
}

impl EmploymentStatus {
    /// Parse a roster status value
    ///
    /// Matching is exact, as in the source roster.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Regular" => EmploymentStatus::Regular,
            "Prl" => EmploymentStatus::Prl,
            other => EmploymentStatus::Other(other.to_string()),
        }
    }

    /// True when employees with this status are projected
    pub fn participates(&self) -> bool {
        matches!(self, EmploymentStatus::Regular | EmploymentStatus::Prl)
    }
}

/// Promotion ladder an employee or post belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Track {
    #[default]
    General,
    It,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::General => write!(f, "GENERAL"),
            Track::It => write!(f, "IT"),
        }
    }
}

/// Which catalog post an employee currently occupies
///
/// `Unassigned` replaces a numeric sentinel: it can never collide with a
/// real sequence number, is never a feeder for any post, and is never
/// counted as an occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostAssignment {
    Assigned(u32),
    Unassigned,
}

impl PostAssignment {
    /// Sequence number of the occupied post, if any
    pub fn seq_no(&self) -> Option<u32> {
        match self {
            PostAssignment::Assigned(seq_no) => Some(*seq_no),
            PostAssignment::Unassigned => None,
        }
    }

    /// True when the employee occupies the post with this sequence number
    pub fn is(&self, seq_no: u32) -> bool {
        *self == PostAssignment::Assigned(seq_no)
    }
}

/// One organization member as read from the roster snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier
    pub emp_id: String,

    /// Display name
    pub name: String,

    pub date_of_birth: NaiveDate,

    pub retirement_date: NaiveDate,

    pub joining_date: NaiveDate,

    /// Grade number at snapshot time (lower = more senior)
    pub grade_no: u32,

    /// Designation number at snapshot time
    pub desg_no: u32,

    pub designation_name: String,

    /// Date of the last real promotion, if any
    pub last_promotion_date: Option<NaiveDate>,

    pub status: EmploymentStatus,

    /// Seniority rank (lower = more senior, absent = least senior)
    pub seniority_rank: Option<u32>,
}

impl Employee {
    /// Date tenure is measured from before any simulated promotion
    pub fn tenure_anchor(&self) -> NaiveDate {
        self.last_promotion_date.unwrap_or(self.joining_date)
    }
}

/// Mutable career state of one employee during a run
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use promotion_projection_core::models::employee::{CareerState, PostAssignment, Track};
///
/// let joined = NaiveDate::from_ymd_opt(2010, 3, 1).unwrap();
/// let mut state = CareerState::new(7, PostAssignment::Assigned(20), Track::General, joined);
///
/// let checkpoint = NaiveDate::from_ymd_opt(2027, 6, 1).unwrap();
/// state.promote(5, 12, Track::General, checkpoint);
/// assert_eq!(state.grade_no(), 5);
/// assert_eq!(state.post(), PostAssignment::Assigned(12));
/// assert_eq!(state.last_promotion(), checkpoint);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerState {
    /// Current simulated grade number
    grade_no: u32,

    /// Currently occupied post
    post: PostAssignment,

    /// Current promotion ladder
    track: Track,

    /// Date of the last simulated promotion (or real one before the first)
    last_promotion: NaiveDate,

    /// Retired employees are out of every pool for the rest of the run
    retired: bool,
}

impl CareerState {
    pub fn new(
        grade_no: u32,
        post: PostAssignment,
        track: Track,
        last_promotion: NaiveDate,
    ) -> Self {
        Self {
            grade_no,
            post,
            track,
            last_promotion,
            retired: false,
        }
    }

    pub fn grade_no(&self) -> u32 {
        self.grade_no
    }

    pub fn post(&self) -> PostAssignment {
        self.post
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn last_promotion(&self) -> NaiveDate {
        self.last_promotion
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// True when the employee still takes part in the projection
    pub fn is_active(&self) -> bool {
        !self.retired
    }

    /// Move the employee into a new post
    pub fn promote(&mut self, grade_no: u32, seq_no: u32, track: Track, on: NaiveDate) {
        debug_assert!(!self.retired, "retired employees cannot be promoted");
        self.grade_no = grade_no;
        self.post = PostAssignment::Assigned(seq_no);
        self.track = track;
        self.last_promotion = on;
    }

    /// Mark the employee retired
    pub fn retire(&mut self) {
        self.retired = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_participation() {
        assert!(EmploymentStatus::parse("Regular").participates());
        assert!(EmploymentStatus::parse("Prl").participates());
        assert!(!EmploymentStatus::parse("regular").participates());
        assert!(!EmploymentStatus::parse("Suspended").participates());
    }

    #[test]
    fn test_unassigned_never_matches_a_post() {
        assert!(!PostAssignment::Unassigned.is(999));
        assert!(PostAssignment::Assigned(999).is(999));
        assert_eq!(PostAssignment::Unassigned.seq_no(), None);
    }
}
