//! Retirement step
//!
//! Once per simulated year, at the checkpoint, every active employee whose
//! retirement date falls in the year ending at the checkpoint is retired.
//!
//! Processing is batched yearly but the emitted event is dated at the
//! employee's actual retirement date, never at the checkpoint.

use crate::core::calendar::within_year_ending;
use crate::models::event::{GradeLabel, PredictedEvent, RETIREMENT_DESIGNATION};
use crate::models::roster::Roster;
use chrono::NaiveDate;

/// Retire employees whose retirement date is in `(checkpoint - 1 year, checkpoint]`
///
/// Events are returned in roster order.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use promotion_projection_core::models::roster::Roster;
/// use promotion_projection_core::steps::retirement::run_retirements;
///
/// let mut roster = Roster::new(Vec::new());
/// let checkpoint = NaiveDate::from_ymd_opt(2027, 6, 1).unwrap();
/// assert!(run_retirements(&mut roster, checkpoint).is_empty());
/// ```
pub fn run_retirements(roster: &mut Roster, checkpoint: NaiveDate) -> Vec<PredictedEvent> {
    let mut events = Vec::new();

    for member in roster.members_mut() {
        if !member.is_active() || !within_year_ending(member.employee.retirement_date, checkpoint) {
            continue;
        }

        member.state.retire();
        events.push(PredictedEvent {
            emp_id: member.employee.emp_id.clone(),
            name: member.employee.name.clone(),
            from_grade: GradeLabel::Grade(member.state.grade_no()),
            to_grade: GradeLabel::Retired,
            new_designation: RETIREMENT_DESIGNATION.to_string(),
            predicted_date: member.employee.retirement_date,
        });
    }

    events
}

/// Retire, without events, everyone who retired before the horizon opened
///
/// `horizon_opening` is the exclusive start of the first retirement window.
/// Employees with a retirement date on or before it already left the
/// organization; they must not occupy posts or compete for promotion.
///
/// Returns the number of employees retired this way.
pub fn settle_pre_horizon_retirements(roster: &mut Roster, horizon_opening: NaiveDate) -> usize {
    let mut settled = 0;
    for member in roster.members_mut() {
        if member.is_active() && member.employee.retirement_date <= horizon_opening {
            member.state.retire();
            settled += 1;
        }
    }
    settled
}
