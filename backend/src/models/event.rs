//! Predicted career events
//!
//! A run emits one `PredictedEvent` per retirement and per promotion, in the
//! order they are produced. The event list is the single output of the
//! engine: it is persisted as-is and every report is derived from it.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use promotion_projection_core::models::event::{GradeLabel, PredictedEvent};
//!
//! let event = PredictedEvent {
//!     emp_id: "E100".to_string(),
//!     name: "A. Rahman".to_string(),
//!     from_grade: GradeLabel::Grade(5),
//!     to_grade: GradeLabel::Retired,
//!     new_designation: "Retirement".to_string(),
//!     predicted_date: NaiveDate::from_ymd_opt(2031, 3, 14).unwrap(),
//! };
//!
//! assert!(event.is_retirement());
//! assert_eq!(event.to_grade.to_string(), "RETIRED");
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Designation recorded on retirement events
pub const RETIREMENT_DESIGNATION: &str = "Retirement";

const RETIRED_LABEL: &str = "RETIRED";
const GRADE_PREFIX: &str = "G-";

/// Error parsing a persisted grade label
#[derive(Debug, Error, PartialEq)]
#[error("Invalid grade label: {0}")]
pub struct GradeLabelError(pub String);

/// Origin or destination of an event: `G-<n>` or `RETIRED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GradeLabel {
    Grade(u32),
    Retired,
}

impl GradeLabel {
    /// Grade number, unless this is the retirement label
    pub fn grade_no(&self) -> Option<u32> {
        match self {
            GradeLabel::Grade(grade_no) => Some(*grade_no),
            GradeLabel::Retired => None,
        }
    }
}

impl fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeLabel::Grade(grade_no) => write!(f, "{}{}", GRADE_PREFIX, grade_no),
            GradeLabel::Retired => write!(f, "{}", RETIRED_LABEL),
        }
    }
}

impl FromStr for GradeLabel {
    type Err = GradeLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == RETIRED_LABEL {
            return Ok(GradeLabel::Retired);
        }
        s.strip_prefix(GRADE_PREFIX)
            .and_then(|n| n.parse().ok())
            .map(GradeLabel::Grade)
            .ok_or_else(|| GradeLabelError(s.to_string()))
    }
}

impl From<GradeLabel> for String {
    fn from(label: GradeLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for GradeLabel {
    type Error = GradeLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One predicted promotion or retirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedEvent {
    pub emp_id: String,
    pub name: String,
    /// Simulated grade before the event
    pub from_grade: GradeLabel,
    /// Destination grade, or `RETIRED`
    pub to_grade: GradeLabel,
    /// Designation after the event (`Retirement` for retirements)
    pub new_designation: String,
    /// Checkpoint date for promotions, actual retirement date for retirements
    #[serde(with = "iso_date")]
    pub predicted_date: NaiveDate,
}

impl PredictedEvent {
    pub fn is_retirement(&self) -> bool {
        self.to_grade == GradeLabel::Retired
    }

    pub fn is_promotion(&self) -> bool {
        !self.is_retirement()
    }

    /// Calendar year of the event date
    pub fn year(&self) -> i32 {
        self.predicted_date.year()
    }
}

/// Ordered log of every event emitted during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<PredictedEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append events in emission order
    pub fn extend(&mut self, events: impl IntoIterator<Item = PredictedEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn num_promotions(&self) -> usize {
        self.events.iter().filter(|e| e.is_promotion()).count()
    }

    pub fn num_retirements(&self) -> usize {
        self.events.iter().filter(|e| e.is_retirement()).count()
    }

    /// Consume the log, yielding the events
    pub fn into_events(self) -> Vec<PredictedEvent> {
        self.events
    }
}

/// Serde adapter for ISO `YYYY-MM-DD` dates
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
