//! Retirement Step Tests
//!
//! Critical invariants tested:
//! - Window is (checkpoint − 1 year, checkpoint]
//! - Events are dated at the actual retirement date
//! - Retired employees free their post and leave every candidate pool
//! - Pre-horizon retirements never produce events

use chrono::NaiveDate;
use promotion_projection_core::catalog::PostCatalog;
use promotion_projection_core::models::employee::{Employee, EmploymentStatus};
use promotion_projection_core::models::event::{GradeLabel, RETIREMENT_DESIGNATION};
use promotion_projection_core::models::post::OrganizationalPost;
use promotion_projection_core::orchestrator::{run_projection_with, ProjectionConfig};
use promotion_projection_core::steps::initializer::initialize_roster;
use promotion_projection_core::steps::retirement::{run_retirements, settle_pre_horizon_retirements};

// ============================================================================
// Test Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn retiring_on(emp_id: &str, retirement_date: NaiveDate) -> Employee {
    Employee {
        emp_id: emp_id.to_string(),
        name: format!("Employee {emp_id}"),
        date_of_birth: date(1966, 1, 1),
        retirement_date,
        joining_date: date(1990, 1, 1),
        grade_no: 5,
        desg_no: 50,
        designation_name: "Senior Officer".to_string(),
        last_promotion_date: None,
        status: EmploymentStatus::Regular,
        seniority_rank: None,
    }
}

fn catalog() -> PostCatalog {
    PostCatalog::new(vec![
        OrganizationalPost::new(1, 4, 40, "Manager")
            .with_headcount(1)
            .with_rule(vec![2], 100, 0),
        OrganizationalPost::new(2, 5, 50, "Senior Officer").with_headcount(10),
    ])
    .unwrap()
}

fn config(reference_date: NaiveDate) -> ProjectionConfig {
    ProjectionConfig {
        reference_date,
        horizon_years: 40,
    }
}

// ============================================================================
// Window boundaries
// ============================================================================

#[test]
fn test_retirement_on_checkpoint_is_dated_exactly() {
    let checkpoint = date(2030, 6, 1);
    let (mut roster, _) = initialize_roster(vec![retiring_on("R1", checkpoint)], &catalog());

    let events = run_retirements(&mut roster, checkpoint);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.emp_id, "R1");
    assert_eq!(event.from_grade, GradeLabel::Grade(5));
    assert_eq!(event.to_grade, GradeLabel::Retired);
    assert_eq!(event.new_designation, RETIREMENT_DESIGNATION);
    assert_eq!(event.predicted_date, checkpoint);
    assert!(roster.get("R1").unwrap().state.is_retired());
}

#[test]
fn test_window_is_open_at_start_closed_at_end() {
    let checkpoint = date(2030, 6, 1);
    let employees = vec![
        retiring_on("OPENING", date(2029, 6, 1)),
        retiring_on("AFTER_OPENING", date(2029, 6, 2)),
        retiring_on("MID_WINDOW", date(2029, 12, 31)),
        retiring_on("NEXT_WINDOW", date(2030, 6, 2)),
    ];
    let (mut roster, _) = initialize_roster(employees, &catalog());

    let events = run_retirements(&mut roster, checkpoint);

    let retired: Vec<(&str, NaiveDate)> = events
        .iter()
        .map(|e| (e.emp_id.as_str(), e.predicted_date))
        .collect();
    assert_eq!(
        retired,
        vec![
            ("AFTER_OPENING", date(2029, 6, 2)),
            ("MID_WINDOW", date(2029, 12, 31)),
        ]
    );
}

#[test]
fn test_retired_employee_is_not_retired_twice() {
    let (mut roster, _) = initialize_roster(vec![retiring_on("R1", date(2030, 3, 1))], &catalog());

    assert_eq!(run_retirements(&mut roster, date(2030, 6, 1)).len(), 1);
    assert!(run_retirements(&mut roster, date(2030, 6, 1)).is_empty());
    assert_eq!(roster.num_active(), 0);
}

#[test]
fn test_retirement_frees_post_for_promotion_same_year() {
    let mut manager = retiring_on("MGR", date(2027, 1, 15));
    manager.grade_no = 4;
    manager.desg_no = 40;
    let mut officer = retiring_on("OFF", date(2050, 1, 1));
    officer.last_promotion_date = Some(date(2020, 1, 1));

    let outcome = run_projection_with(
        config(date(2026, 8, 1)),
        vec![manager, officer],
        catalog().posts().to_vec(),
    )
    .unwrap();

    let first_year: Vec<(&str, GradeLabel)> = outcome
        .events
        .iter()
        .filter(|e| e.predicted_date <= date(2027, 6, 1))
        .map(|e| (e.emp_id.as_str(), e.to_grade))
        .collect();
    assert_eq!(
        first_year,
        vec![("MGR", GradeLabel::Retired), ("OFF", GradeLabel::Grade(4))]
    );
}

// ============================================================================
// Pre-horizon retirements
// ============================================================================

#[test]
fn test_settle_pre_horizon_marks_without_events() {
    let opening = date(2025, 6, 1);
    let employees = vec![
        retiring_on("GONE", date(2024, 12, 1)),
        retiring_on("ON_OPENING", opening),
        retiring_on("STAYING", date(2025, 6, 2)),
    ];
    let (mut roster, _) = initialize_roster(employees, &catalog());

    assert_eq!(settle_pre_horizon_retirements(&mut roster, opening), 2);
    assert!(roster.get("GONE").unwrap().state.is_retired());
    assert!(roster.get("ON_OPENING").unwrap().state.is_retired());
    assert!(roster.get("STAYING").unwrap().state.is_active());
}

/// E2: retirement six months before the first window opens
#[test]
fn test_pre_horizon_retiree_never_appears_in_output() {
    // Reference 2026-03-01 → first checkpoint 2026-06-01, window opens 2025-06-01
    let mut gone = retiring_on("E2", date(2024, 12, 1));
    gone.grade_no = 4;
    gone.desg_no = 40;
    let mut officer = retiring_on("OFF", date(2055, 1, 1));
    officer.last_promotion_date = Some(date(2020, 1, 1));

    let outcome = run_projection_with(
        config(date(2026, 3, 1)),
        vec![gone, officer],
        catalog().posts().to_vec(),
    )
    .unwrap();

    assert!(outcome.events.iter().all(|e| e.emp_id != "E2"));
    assert_eq!(outcome.manifest.num_pre_horizon_retirements, 1);

    // E2 does not hold the manager post, so it is free in year one
    let promotion = outcome.events.iter().find(|e| e.is_promotion()).unwrap();
    assert_eq!(promotion.emp_id, "OFF");
    assert_eq!(promotion.predicted_date, date(2026, 6, 1));
}

#[test]
fn test_retirement_before_reference_inside_first_window_is_emitted() {
    // Window (2025-06-01, 2026-06-01]; run triggered after the retirement date
    let outcome = run_projection_with(
        config(date(2026, 3, 1)),
        vec![retiring_on("LATE", date(2025, 12, 1))],
        catalog().posts().to_vec(),
    )
    .unwrap();

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].to_grade, GradeLabel::Retired);
    assert_eq!(outcome.events[0].predicted_date, date(2025, 12, 1));
    assert_eq!(outcome.manifest.num_pre_horizon_retirements, 0);
}
