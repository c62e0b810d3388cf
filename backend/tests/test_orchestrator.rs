//! Orchestrator Integration Tests
//!
//! Full runs over small rosters, from `NotStarted` to `Completed`.
//!
//! Critical invariants tested:
//! - Horizon covers start year through start + 40 inclusive
//! - Later years observe every earlier state change
//! - Non-participating statuses never reach the output
//! - A failed setup returns an error and no events

use chrono::NaiveDate;
use promotion_projection_core::catalog::CatalogError;
use promotion_projection_core::models::employee::{Employee, EmploymentStatus, PostAssignment};
use promotion_projection_core::models::event::GradeLabel;
use promotion_projection_core::models::post::OrganizationalPost;
use promotion_projection_core::orchestrator::{
    run_projection_with, ProjectionConfig, ProjectionEngine, ProjectionError, ProjectionPhase,
    DEFAULT_HORIZON_YEARS,
};
use promotion_projection_core::steps::InitSummary;

// ============================================================================
// Test Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config(reference_date: NaiveDate) -> ProjectionConfig {
    ProjectionConfig {
        reference_date,
        horizon_years: DEFAULT_HORIZON_YEARS,
    }
}

fn employee(emp_id: &str, grade_no: u32, desg_no: u32) -> Employee {
    Employee {
        emp_id: emp_id.to_string(),
        name: format!("Employee {emp_id}"),
        date_of_birth: date(1990, 1, 1),
        retirement_date: date(2070, 1, 1),
        joining_date: date(2012, 1, 1),
        grade_no,
        desg_no,
        designation_name: format!("Designation {desg_no}"),
        last_promotion_date: None,
        status: EmploymentStatus::Regular,
        seniority_rank: None,
    }
}

/// Three-level ladder: 3 (officer) → 2 (senior officer) → 1 (manager)
fn ladder() -> Vec<OrganizationalPost> {
    vec![
        OrganizationalPost::new(1, 4, 40, "Manager")
            .with_headcount(1)
            .with_rule(vec![2], 100, 2),
        OrganizationalPost::new(2, 5, 50, "Senior Officer")
            .with_headcount(1)
            .with_rule(vec![3], 100, 2),
        OrganizationalPost::new(3, 6, 60, "Officer").with_headcount(5),
    ]
}

// ============================================================================
// Scenarios
// ============================================================================

/// E1: sole feeder occupant with ample tenure moves up in year one
#[test]
fn test_sole_candidate_promoted_in_first_year() {
    let posts = vec![
        OrganizationalPost::new(5, 4, 40, "Deputy Manager")
            .with_headcount(1)
            .with_rule(vec![10], 100, 3),
        OrganizationalPost::new(10, 5, 50, "Senior Officer").with_headcount(3),
    ];
    let mut e1 = employee("E1", 5, 50);
    e1.seniority_rank = Some(2);
    e1.last_promotion_date = Some(date(2016, 6, 1));

    let outcome = run_projection_with(config(date(2026, 3, 1)), vec![e1], posts).unwrap();

    assert_eq!(outcome.events.len(), 1);
    let event = &outcome.events[0];
    assert_eq!(event.emp_id, "E1");
    assert_eq!(event.from_grade, GradeLabel::Grade(5));
    assert_eq!(event.to_grade, GradeLabel::Grade(4));
    assert_eq!(event.new_designation, "Deputy Manager");
    assert_eq!(event.predicted_date, date(2026, 6, 1));
}

#[test]
fn test_career_climbs_ladder_across_years() {
    let mut climber = employee("C1", 6, 60);
    climber.last_promotion_date = Some(date(2020, 1, 1));

    let outcome = run_projection_with(config(date(2026, 1, 10)), vec![climber], ladder()).unwrap();

    let path: Vec<(GradeLabel, NaiveDate)> = outcome
        .events
        .iter()
        .map(|e| (e.to_grade, e.predicted_date))
        .collect();
    // 2026-06-01 → 2028-06-01 spans a leap day: 731 days ≥ 2 × 365.25
    assert_eq!(
        path,
        vec![
            (GradeLabel::Grade(5), date(2026, 6, 1)),
            (GradeLabel::Grade(4), date(2028, 6, 1)),
        ]
    );
}

#[test]
fn test_retirement_inside_horizon_is_emitted_last() {
    let mut retiree = employee("R1", 4, 40);
    retiree.retirement_date = date(2040, 2, 29);

    let outcome = run_projection_with(config(date(2026, 1, 10)), vec![retiree], ladder()).unwrap();

    assert_eq!(outcome.events.len(), 1);
    assert!(outcome.events[0].is_retirement());
    assert_eq!(outcome.events[0].predicted_date, date(2040, 2, 29));
}

#[test]
fn test_retirement_after_horizon_is_never_emitted() {
    let mut young = employee("Y1", 4, 40);
    young.retirement_date = date(2066, 6, 2);

    let outcome = run_projection_with(config(date(2026, 1, 10)), vec![young], ladder()).unwrap();
    assert!(outcome.events.is_empty());
}

#[test]
fn test_excluded_statuses_never_appear() {
    let mut contractor = employee("X1", 6, 60);
    contractor.status = EmploymentStatus::Other("Contract".to_string());
    contractor.retirement_date = date(2030, 1, 1);
    let mut prl = employee("P1", 6, 60);
    prl.status = EmploymentStatus::Prl;
    prl.retirement_date = date(2030, 1, 1);

    let outcome =
        run_projection_with(config(date(2026, 1, 10)), vec![contractor, prl], ladder()).unwrap();

    assert!(outcome.events.iter().all(|e| e.emp_id != "X1"));
    assert!(outcome.events.iter().any(|e| e.emp_id == "P1" && e.is_retirement()));
}

// ============================================================================
// Engine lifecycle
// ============================================================================

#[test]
fn test_full_horizon_is_forty_one_years() {
    let mut engine = ProjectionEngine::new(config(date(2026, 9, 1)), Vec::new(), ladder()).unwrap();

    let mut years = Vec::new();
    while let Some(result) = engine.step_year().unwrap() {
        assert_eq!(result.checkpoint, date(result.year, 6, 1));
        years.push(result.year);
    }

    assert_eq!(years.len(), 41);
    assert_eq!(years.first(), Some(&2027));
    assert_eq!(years.last(), Some(&2067));
    assert_eq!(engine.phase(), ProjectionPhase::Completed);
}

#[test]
fn test_engine_state_after_first_year() {
    let mut climber = employee("C1", 6, 60);
    climber.last_promotion_date = Some(date(2020, 1, 1));
    let mut gone = employee("G1", 6, 60);
    gone.retirement_date = date(2020, 1, 1);
    let unassigned = employee("U1", 9, 99);
    let mut contractor = employee("X1", 6, 60);
    contractor.status = EmploymentStatus::Other("Contract".to_string());

    let mut engine = ProjectionEngine::new(
        config(date(2026, 1, 10)),
        vec![climber, gone, unassigned, contractor],
        ladder(),
    )
    .unwrap();

    assert_eq!(
        engine.init_summary(),
        InitSummary {
            num_participating: 3,
            num_excluded: 1,
            num_unassigned: 1,
        }
    );
    assert_eq!(engine.roster().len(), 3);
    assert!(engine.roster().get("X1").is_none());

    let first = engine.step_year().unwrap().unwrap();
    assert_eq!(first.year, 2026);
    assert_eq!(first.num_promotions, 1);
    // Pre-horizon retirements are settled without events
    assert_eq!(first.num_retirements, 0);

    let roster = engine.roster();
    assert!(roster.get("G1").unwrap().state.is_retired());
    assert_eq!(roster.get("C1").unwrap().state.grade_no(), 5);
    assert_eq!(roster.get("C1").unwrap().state.post(), PostAssignment::Assigned(2));
    assert_eq!(roster.get("U1").unwrap().state.post(), PostAssignment::Unassigned);
    assert_eq!(roster.num_active(), 2);
}

#[test]
fn test_manifest_counts_match_events() {
    let mut retiree = employee("R1", 4, 40);
    retiree.retirement_date = date(2031, 3, 3);
    let mut gone = employee("G1", 6, 60);
    gone.retirement_date = date(2020, 1, 1);
    let unassigned = employee("U1", 9, 99);
    let mut climber = employee("C1", 6, 60);
    climber.last_promotion_date = Some(date(2020, 1, 1));

    let outcome = run_projection_with(
        config(date(2026, 1, 10)),
        vec![retiree, gone, unassigned, climber],
        ladder(),
    )
    .unwrap();
    let manifest = &outcome.manifest;

    assert_eq!(manifest.start_year, 2026);
    assert_eq!(manifest.end_year, 2066);
    assert_eq!(manifest.num_events, outcome.events.len());
    assert_eq!(
        manifest.num_promotions,
        outcome.events.iter().filter(|e| e.is_promotion()).count()
    );
    assert_eq!(
        manifest.num_retirements,
        outcome.events.iter().filter(|e| e.is_retirement()).count()
    );
    assert_eq!(manifest.num_pre_horizon_retirements, 1);
    assert_eq!(manifest.num_unassigned, 1);
    assert_eq!(manifest.input_hash.len(), 64);
}

#[test]
fn test_duplicate_catalog_key_fails_run() {
    let mut posts = ladder();
    posts.push(OrganizationalPost::new(4, 6, 60, "Officer (duplicate)"));

    let result = run_projection_with(config(date(2026, 1, 10)), vec![employee("A", 6, 60)], posts);

    assert_eq!(
        result.unwrap_err(),
        ProjectionError::Catalog(CatalogError::DuplicatePost {
            grade_no: 6,
            desg_no: 60
        })
    );
}

#[test]
fn test_zero_horizon_is_invalid() {
    let config = ProjectionConfig {
        reference_date: date(2026, 1, 10),
        horizon_years: 0,
    };
    let result = run_projection_with(config, Vec::new(), ladder());
    assert!(matches!(result, Err(ProjectionError::InvalidConfig(_))));
}
