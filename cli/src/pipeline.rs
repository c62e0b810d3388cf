//! Load → project → persist
//!
//! Shared by the `run` command and the HTTP trigger. The store is touched only
//! after the projection has completed in memory, so a failed load or run
//! leaves the previous predictions in place.

use promotion_projection_core::loader::{load_employees, load_posts, LoadError};
use promotion_projection_core::orchestrator::{run_projection, ProjectionError, ProjectionOutcome};
use promotion_projection_core::persistence::{PersistenceError, PredictionStore};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Where inputs are read from and predictions written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub employees_csv: PathBuf,
    pub posts_csv: PathBuf,
    pub db: PathBuf,
}

impl Sources {
    pub fn open_store(&self) -> Result<PredictionStore, PersistenceError> {
        PredictionStore::open(&self.db)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to load inputs: {0}")]
    Load(#[from] LoadError),

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Failed to store predictions: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Run a full projection from the source files and replace the stored output
pub fn run_and_persist(sources: &Sources) -> Result<ProjectionOutcome, PipelineError> {
    let employees = load_employees(&sources.employees_csv)?;
    let posts = load_posts(&sources.posts_csv)?;

    let outcome = run_projection(employees, posts)?;

    let mut store = sources.open_store()?;
    store.replace_predictions(&outcome.manifest, &outcome.events)?;

    info!(
        run_id = %outcome.manifest.run_id,
        db = %sources.db.display(),
        "projection persisted"
    );
    Ok(outcome)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Sources;
    use std::path::Path;

    pub const EMPLOYEES_CSV: &str = "\
emp_id,emp_nm,dob,retr_dt,jjoin_date,grade_no,desg_no,desg_nm,lastpromotiondate,status,senior_id
1001,Ayesha Rahman,3/7/1968,3/6/2080,1/15/1995,5,50,Senior Officer,6/1/2010,Regular,2
1002,Karim Uddin,11/20/1975,11/19/2081,2/1/2001,6,60,Officer,,Regular,
1003,Nusrat Jahan,1/1/1980,12/31/2082,7/1/2005,6,60,Officer,,Contract,
";

    pub const POSTS_CSV: &str = "\
SL_No,grade_no,desg_no,desg_nm,IT_or_General,TotalPost,\
YearNeedtobepromoted,PromotionFromPostSL,PreviousPostPercentise
5,4,40,Deputy Manager,General,1,3,10,100
10,5,50,Senior Officer,General,2,2,11,100
11,6,60,Officer,General,10,,,
";

    /// Write both source files into `dir` and point the store next to them
    pub fn write_sources(dir: &Path) -> Sources {
        let sources = Sources {
            employees_csv: dir.join("EmpList.csv"),
            posts_csv: dir.join("Final_Complete_Master_List.csv"),
            db: dir.join("Promotion.db"),
        };
        std::fs::write(&sources.employees_csv, EMPLOYEES_CSV).unwrap();
        std::fs::write(&sources.posts_csv, POSTS_CSV).unwrap();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::write_sources;
    use super::*;

    #[test]
    fn test_run_and_persist_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path());

        let outcome = run_and_persist(&sources).unwrap();

        let store = sources.open_store().unwrap();
        assert_eq!(store.count().unwrap(), outcome.events.len());
        assert!(outcome.events.iter().all(|e| e.emp_id != "1003"));
        assert_eq!(store.latest_run().unwrap(), Some(outcome.manifest));
    }

    #[test]
    fn test_failed_load_keeps_previous_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path());
        let first = run_and_persist(&sources).unwrap();

        std::fs::remove_file(&sources.posts_csv).unwrap();
        let result = run_and_persist(&sources);

        assert!(matches!(result, Err(PipelineError::Load(LoadError::Io { .. }))));
        let store = sources.open_store().unwrap();
        assert_eq!(store.all_events().unwrap(), first.events);
    }
}
