//! Projection Engine - horizon orchestrator
//!
//! Drives the year-by-year loop from the first checkpoint to the horizon:
//!
//! ```text
//! NotStarted
//!   └─ settle pre-horizon retirements
//! Running(year), for each year start..=start+40:
//!   1. checkpoint = June 1 of year
//!   2. Retirement step (events dated at actual retirement dates)
//!   3. Promotion step (events dated at the checkpoint)
//!   4. Append events in emission order
//! Completed
//! ```
//!
//! The loop is strictly sequential: every year observes the state changes of
//! all earlier years. There is no early exit; a run always covers the whole
//! horizon. The engine owns its roster for the run and returns the events to
//! the caller, who decides whether to persist them.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use promotion_projection_core::orchestrator::{
//!     ProjectionConfig, ProjectionEngine, ProjectionPhase,
//! };
//!
//! let config = ProjectionConfig {
//!     reference_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
//!     horizon_years: 40,
//! };
//!
//! let mut engine = ProjectionEngine::new(config, Vec::new(), Vec::new()).unwrap();
//! assert_eq!(engine.phase(), ProjectionPhase::NotStarted);
//!
//! let first = engine.step_year().unwrap().unwrap();
//! assert_eq!(first.year, 2026);
//!
//! let outcome = engine.run_to_completion().unwrap();
//! assert!(outcome.events.is_empty());
//! assert_eq!(outcome.manifest.end_year, 2066);
//! ```

use crate::catalog::{CatalogError, PostCatalog};
use crate::core::calendar::{checkpoint_date, ProjectionCalendar};
use crate::models::employee::Employee;
use crate::models::event::{EventLog, PredictedEvent};
use crate::models::post::OrganizationalPost;
use crate::models::roster::Roster;
use crate::orchestrator::manifest::{
    compute_events_digest, compute_input_hash, new_run_id, RunManifest,
};
use crate::steps::{
    initialize_roster, run_promotions, run_retirements, settle_pre_horizon_retirements, InitSummary,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Number of years projected after the start year
pub const DEFAULT_HORIZON_YEARS: u32 = 40;

/// Longest horizon a config may ask for
pub const MAX_HORIZON_YEARS: u32 = 200;

// ============================================================================
// Configuration Types
// ============================================================================

/// Projection configuration
///
/// # Fields
///
/// * `reference_date` - Date the run is anchored at (normally today)
/// * `horizon_years` - Years projected after the start year, inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub reference_date: NaiveDate,
    pub horizon_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            reference_date: chrono::Local::now().date_naive(),
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

/// Projection error types
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("No checkpoint date exists for year {year}")]
    DateOutOfRange { year: i32 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionPhase {
    NotStarted,
    /// Next year to process
    Running { year: i32 },
    Completed,
}

/// What happened in one simulated year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearResult {
    pub year: i32,
    pub checkpoint: NaiveDate,
    pub num_retirements: usize,
    pub num_promotions: usize,
}

/// Complete output of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOutcome {
    pub events: Vec<PredictedEvent>,
    pub manifest: RunManifest,
}

/// Year-by-year projection over a roster and a post catalog
pub struct ProjectionEngine {
    config: ProjectionConfig,
    calendar: ProjectionCalendar,
    catalog: PostCatalog,
    roster: Roster,
    init_summary: InitSummary,
    event_log: EventLog,
    phase: ProjectionPhase,
    num_pre_horizon_retirements: usize,
    input_hash: String,
}

#[derive(Serialize)]
struct ProjectionInputs<'a> {
    config: &'a ProjectionConfig,
    employees: &'a [Employee],
    posts: &'a [OrganizationalPost],
}

impl ProjectionEngine {
    /// Create an engine from a roster snapshot and a catalog
    ///
    /// Validates the config, builds the catalog and runs the state
    /// initializer. No year is simulated yet.
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectionEngine)` - Ready to run
    /// * `Err(ProjectionError)` - Invalid config or catalog
    pub fn new(
        config: ProjectionConfig,
        employees: Vec<Employee>,
        posts: Vec<OrganizationalPost>,
    ) -> Result<Self, ProjectionError> {
        Self::validate_config(&config)?;

        let input_hash = compute_input_hash(&ProjectionInputs {
            config: &config,
            employees: &employees,
            posts: &posts,
        })?;

        let calendar = ProjectionCalendar::new(config.reference_date, config.horizon_years);
        let catalog = PostCatalog::new(posts)?;
        let (roster, init_summary) = initialize_roster(employees, &catalog);

        Ok(Self {
            config,
            calendar,
            catalog,
            roster,
            init_summary,
            event_log: EventLog::new(),
            phase: ProjectionPhase::NotStarted,
            num_pre_horizon_retirements: 0,
            input_hash,
        })
    }

    /// Validate configuration
    fn validate_config(config: &ProjectionConfig) -> Result<(), ProjectionError> {
        if config.horizon_years == 0 {
            return Err(ProjectionError::InvalidConfig(
                "horizon_years must be > 0".to_string(),
            ));
        }

        if config.horizon_years > MAX_HORIZON_YEARS {
            return Err(ProjectionError::InvalidConfig(format!(
                "horizon_years must be <= {}",
                MAX_HORIZON_YEARS
            )));
        }

        let calendar = ProjectionCalendar::new(config.reference_date, config.horizon_years);
        if calendar.horizon_opening().is_none() || checkpoint_date(calendar.end_year()).is_none() {
            return Err(ProjectionError::InvalidConfig(format!(
                "horizon {}..={} is outside the supported calendar",
                calendar.start_year(),
                calendar.end_year()
            )));
        }

        Ok(())
    }

    pub fn phase(&self) -> ProjectionPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn init_summary(&self) -> InitSummary {
        self.init_summary
    }

    /// Leave `NotStarted`: retire everyone who left before the horizon opened
    fn begin(&mut self) -> Result<i32, ProjectionError> {
        let start_year = self.calendar.start_year();
        let opening = self
            .calendar
            .horizon_opening()
            .ok_or(ProjectionError::DateOutOfRange { year: start_year })?;

        self.num_pre_horizon_retirements =
            settle_pre_horizon_retirements(&mut self.roster, opening);

        info!(
            start_year,
            end_year = self.calendar.end_year(),
            employees = self.roster.len(),
            posts = self.catalog.len(),
            pre_horizon_retirements = self.num_pre_horizon_retirements,
            "projection started"
        );
        Ok(start_year)
    }

    /// Simulate the next year
    ///
    /// Returns `Ok(None)` once the horizon has been completed.
    pub fn step_year(&mut self) -> Result<Option<YearResult>, ProjectionError> {
        let year = match self.phase {
            ProjectionPhase::NotStarted => self.begin()?,
            ProjectionPhase::Running { year } => year,
            ProjectionPhase::Completed => return Ok(None),
        };

        let checkpoint = checkpoint_date(year).ok_or(ProjectionError::DateOutOfRange { year })?;

        // Retirements run first so vacancies are visible to promotions
        let retirements = run_retirements(&mut self.roster, checkpoint);
        let promotions = run_promotions(&mut self.roster, &self.catalog, checkpoint);

        let result = YearResult {
            year,
            checkpoint,
            num_retirements: retirements.len(),
            num_promotions: promotions.len(),
        };
        debug!(
            year,
            retirements = result.num_retirements,
            promotions = result.num_promotions,
            "year projected"
        );

        self.event_log.extend(retirements);
        self.event_log.extend(promotions);

        self.phase = if year >= self.calendar.end_year() {
            ProjectionPhase::Completed
        } else {
            ProjectionPhase::Running { year: year + 1 }
        };

        Ok(Some(result))
    }

    /// Simulate every remaining year and return the full event list
    pub fn run_to_completion(mut self) -> Result<ProjectionOutcome, ProjectionError> {
        while self.step_year()?.is_some() {}

        let num_promotions = self.event_log.num_promotions();
        let num_retirements = self.event_log.num_retirements();
        let events = self.event_log.into_events();
        let manifest = RunManifest {
            run_id: new_run_id(),
            reference_date: self.config.reference_date,
            start_year: self.calendar.start_year(),
            end_year: self.calendar.end_year(),
            input_hash: self.input_hash,
            events_digest: compute_events_digest(&events)?,
            num_events: events.len(),
            num_promotions,
            num_retirements,
            num_pre_horizon_retirements: self.num_pre_horizon_retirements,
            num_unassigned: self.init_summary.num_unassigned,
        };

        info!(
            run_id = %manifest.run_id,
            events = manifest.num_events,
            promotions = manifest.num_promotions,
            retirements = manifest.num_retirements,
            "projection completed"
        );

        Ok(ProjectionOutcome { events, manifest })
    }
}

impl std::fmt::Debug for ProjectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionEngine")
            .field("phase", &self.phase)
            .field("calendar", &self.calendar)
            .field("num_employees", &self.roster.len())
            .field("num_posts", &self.catalog.len())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

/// Run a full projection with the default config (anchored at today)
///
/// This is the trigger: it takes only the inputs, runs the initializer and
/// the whole horizon, and returns either every event or an error. Nothing is
/// returned on failure.
pub fn run_projection(
    employees: Vec<Employee>,
    posts: Vec<OrganizationalPost>,
) -> Result<ProjectionOutcome, ProjectionError> {
    run_projection_with(ProjectionConfig::default(), employees, posts)
}

/// Run a full projection with an explicit config
pub fn run_projection_with(
    config: ProjectionConfig,
    employees: Vec<Employee>,
    posts: Vec<OrganizationalPost>,
) -> Result<ProjectionOutcome, ProjectionError> {
    ProjectionEngine::new(config, employees, posts)?.run_to_completion()
}
