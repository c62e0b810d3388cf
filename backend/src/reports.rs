//! Report shaping
//!
//! Pure functions turning an event list into the views served to clients.
//! They work on any slice of events, whether it comes straight from a run or
//! back out of the prediction store.

use crate::models::event::{iso_date, GradeLabel, PredictedEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One employee as listed by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub emp_id: String,
    pub name: String,
    /// Origin grade of the employee's earliest event
    pub current_grade: GradeLabel,
}

/// One step of an employee's projected career
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionStep {
    /// 1-based position in the employee's timeline
    pub step: usize,
    pub from_grade: GradeLabel,
    pub to_grade: GradeLabel,
    pub new_designation: String,
    #[serde(with = "iso_date")]
    pub predicted_date: NaiveDate,
}

/// Career path of one employee up to a target date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionReport {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub current_grade: Option<GradeLabel>,
    #[serde(with = "optional_iso_date")]
    pub target_date: Option<NaiveDate>,
    /// Steps in the path that are promotions
    pub total_promotions: usize,
    pub final_position: Option<PredictionStep>,
    pub promotion_path: Vec<PredictionStep>,
}

/// Grade progression of one employee, for overview charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradePath {
    pub emp_id: String,
    pub name: String,
    pub grade_path: Vec<u32>,
}

/// Number of promotions dated in one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCount {
    pub year: i32,
    pub count: usize,
}

fn ordered_by_date(events: &[PredictedEvent]) -> Vec<&PredictedEvent> {
    let mut ordered: Vec<&PredictedEvent> = events.iter().collect();
    // Stable: events on the same date keep emission order
    ordered.sort_by_key(|e| e.predicted_date);
    ordered
}

/// One summary per employee, ordered by name then ID
pub fn employee_summaries(events: &[PredictedEvent]) -> Vec<EmployeeSummary> {
    let mut first_events: BTreeMap<&str, &PredictedEvent> = BTreeMap::new();
    for event in ordered_by_date(events) {
        first_events.entry(event.emp_id.as_str()).or_insert(event);
    }

    let mut summaries: Vec<EmployeeSummary> = first_events
        .into_values()
        .map(|event| EmployeeSummary {
            emp_id: event.emp_id.clone(),
            name: event.name.clone(),
            current_grade: event.from_grade,
        })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.emp_id.cmp(&b.emp_id)));
    summaries
}

/// Summary of one employee, if they have any event
pub fn employee_summary(events: &[PredictedEvent], emp_id: &str) -> Option<EmployeeSummary> {
    ordered_by_date(events)
        .into_iter()
        .find(|e| e.emp_id == emp_id)
        .map(|event| EmployeeSummary {
            emp_id: event.emp_id.clone(),
            name: event.name.clone(),
            current_grade: event.from_grade,
        })
}

/// Numbered steps of one employee's timeline
pub fn prediction_steps(events: &[PredictedEvent], emp_id: &str) -> Vec<PredictionStep> {
    ordered_by_date(events)
        .into_iter()
        .filter(|e| e.emp_id == emp_id)
        .enumerate()
        .map(|(index, event)| PredictionStep {
            step: index + 1,
            from_grade: event.from_grade,
            to_grade: event.to_grade,
            new_designation: event.new_designation.clone(),
            predicted_date: event.predicted_date,
        })
        .collect()
}

/// Career path of one employee up to `target_date` (inclusive)
///
/// Without a target date the whole projected path is reported.
pub fn promotion_report(
    events: &[PredictedEvent],
    emp_id: &str,
    target_date: Option<NaiveDate>,
) -> PromotionReport {
    let summary = employee_summary(events, emp_id);
    let promotion_path: Vec<PredictionStep> = prediction_steps(events, emp_id)
        .into_iter()
        .take_while(|step| target_date.map_or(true, |target| step.predicted_date <= target))
        .collect();

    PromotionReport {
        employee_id: emp_id.to_string(),
        employee_name: summary.as_ref().map(|s| s.name.clone()),
        current_grade: summary.map(|s| s.current_grade),
        target_date,
        total_promotions: promotion_path
            .iter()
            .filter(|s| s.to_grade != GradeLabel::Retired)
            .count(),
        final_position: promotion_path.last().cloned(),
        promotion_path,
    }
}

/// Destination grades of every employee in date order, retirement omitted
pub fn grade_paths(events: &[PredictedEvent]) -> Vec<GradePath> {
    let mut paths: BTreeMap<&str, GradePath> = BTreeMap::new();
    for event in ordered_by_date(events) {
        let path = paths.entry(event.emp_id.as_str()).or_insert_with(|| GradePath {
            emp_id: event.emp_id.clone(),
            name: event.name.clone(),
            grade_path: Vec::new(),
        });
        if let Some(grade_no) = event.to_grade.grade_no() {
            path.grade_path.push(grade_no);
        }
    }

    let mut paths: Vec<GradePath> = paths.into_values().collect();
    paths.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.emp_id.cmp(&b.emp_id)));
    paths
}

/// Promotions per event year, ascending
pub fn promotions_per_year(events: &[PredictedEvent]) -> Vec<YearlyCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for event in events.iter().filter(|e| e.is_promotion()) {
        *counts.entry(event.year()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearlyCount { year, count })
        .collect()
}

mod optional_iso_date {
    use super::iso_date::FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
