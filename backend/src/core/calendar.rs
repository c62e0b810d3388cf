//! Calendar management for the projection
//!
//! The projection advances in whole years. Every simulated year is anchored at
//! a single checkpoint date (June 1) at which retirements and promotions are
//! processed. This module owns the date arithmetic so the steps never have to
//! reason about month boundaries or leap years themselves.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month of the yearly checkpoint (June)
pub const CHECKPOINT_MONTH: u32 = 6;

/// Day of the yearly checkpoint
pub const CHECKPOINT_DAY: u32 = 1;

/// Runs started after this month begin projecting from the following year
pub const MID_YEAR_CUTOFF_MONTH: u32 = 6;

/// Length of a tenure year in days
pub const DAYS_PER_TENURE_YEAR: f64 = 365.25;

/// Manages the simulated years of one projection run
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use promotion_projection_core::ProjectionCalendar;
///
/// let today = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
/// let calendar = ProjectionCalendar::new(today, 40);
/// assert_eq!(calendar.start_year(), 2027);
/// assert_eq!(calendar.end_year(), 2067);
/// assert_eq!(calendar.num_years(), 41);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionCalendar {
    /// First simulated year
    start_year: i32,
    /// Number of years after the start year (inclusive horizon)
    horizon_years: u32,
}

impl ProjectionCalendar {
    /// Create a calendar for a run triggered on `reference_date`
    ///
    /// The start year is the reference year, moved forward by one when the
    /// reference date falls after June.
    pub fn new(reference_date: NaiveDate, horizon_years: u32) -> Self {
        let mut start_year = reference_date.year();
        if reference_date.month() > MID_YEAR_CUTOFF_MONTH {
            start_year += 1;
        }
        Self {
            start_year,
            horizon_years,
        }
    }

    /// First simulated year
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last simulated year (inclusive)
    pub fn end_year(&self) -> i32 {
        self.start_year + self.horizon_years as i32
    }

    /// Number of simulated years, horizon included
    pub fn num_years(&self) -> usize {
        self.horizon_years as usize + 1
    }

    /// Iterate the simulated years in order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year()
    }

    /// Checkpoint date of the first simulated year
    pub fn first_checkpoint(&self) -> Option<NaiveDate> {
        checkpoint_date(self.start_year)
    }

    /// Opening of the first retirement window
    ///
    /// Retirement dates on or before this date are pre-horizon and never
    /// produce an event.
    pub fn horizon_opening(&self) -> Option<NaiveDate> {
        self.first_checkpoint().and_then(window_opening)
    }
}

/// Checkpoint date for a simulated year
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use promotion_projection_core::core::calendar::checkpoint_date;
///
/// assert_eq!(checkpoint_date(2030), NaiveDate::from_ymd_opt(2030, 6, 1));
/// ```
pub fn checkpoint_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, CHECKPOINT_MONTH, CHECKPOINT_DAY)
}

/// Exclusive lower bound of the one-year window ending at `checkpoint`
pub fn window_opening(checkpoint: NaiveDate) -> Option<NaiveDate> {
    checkpoint.checked_sub_months(Months::new(12))
}

/// True when `date` lies in the one-year window ending at `checkpoint`
///
/// The window is open at the start and closed at the end: a date exactly on
/// the checkpoint belongs to it, a date exactly one year earlier does not.
pub fn within_year_ending(date: NaiveDate, checkpoint: NaiveDate) -> bool {
    match window_opening(checkpoint) {
        Some(opening) => date <= checkpoint && date > opening,
        None => date <= checkpoint,
    }
}

/// Elapsed tenure between two dates, in 365.25-day years
pub fn tenure_years(since: NaiveDate, at: NaiveDate) -> f64 {
    (at - since).num_days() as f64 / DAYS_PER_TENURE_YEAR
}
