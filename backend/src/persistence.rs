//! SQLite prediction store
//!
//! Holds the output of the latest successful run. The store is only written
//! after a run has fully completed in memory, and the write replaces every
//! prior prediction inside one transaction: readers see either the previous
//! projection or the new one, never a mix and never an empty table left by a
//! failed run.
//!
//! # Tables
//!
//! - `predictions`: one row per event, `sequence` preserving emission order
//! - `projection_runs`: the manifest of the run the predictions came from

use crate::models::event::{iso_date, GradeLabel, PredictedEvent};
use crate::orchestrator::manifest::RunManifest;
use crate::reports::YearlyCount;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur in the prediction store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored row is invalid: {0}")]
    InvalidRow(String),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id TEXT NOT NULL,
        sequence INTEGER NOT NULL,
        emp_id TEXT NOT NULL,
        name TEXT NOT NULL,
        from_grade TEXT NOT NULL,
        to_grade TEXT NOT NULL,
        new_designation TEXT NOT NULL,
        predicted_date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_predictions_emp_id ON predictions(emp_id);
    CREATE INDEX IF NOT EXISTS idx_predictions_date ON predictions(predicted_date);
    CREATE TABLE IF NOT EXISTS projection_runs (
        run_id TEXT PRIMARY KEY,
        reference_date TEXT NOT NULL,
        start_year INTEGER NOT NULL,
        end_year INTEGER NOT NULL,
        input_hash TEXT NOT NULL,
        events_digest TEXT NOT NULL,
        num_events INTEGER NOT NULL,
        num_promotions INTEGER NOT NULL,
        num_retirements INTEGER NOT NULL,
        num_pre_horizon_retirements INTEGER NOT NULL,
        num_unassigned INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );";

const EVENT_COLUMNS: &str = "emp_id, name, from_grade, to_grade, new_designation, predicted_date";

#[derive(Debug)]
pub struct PredictionStore {
    conn: Connection,
}

impl PredictionStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, PersistenceError> {
        let store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    fn configure(&self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    fn migrate(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Replace the stored projection with a completed run
    ///
    /// Deletes every prior prediction and manifest, inserts `events` in
    /// emission order and records the new manifest, all in one transaction.
    pub fn replace_predictions(
        &mut self,
        manifest: &RunManifest,
        events: &[PredictedEvent],
    ) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM predictions", [])?;
        tx.execute("DELETE FROM projection_runs", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO predictions (
                    run_id,
                    sequence,
                    emp_id,
                    name,
                    from_grade,
                    to_grade,
                    new_designation,
                    predicted_date
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (sequence, event) in events.iter().enumerate() {
                insert.execute(params![
                    manifest.run_id.as_str(),
                    i64::try_from(sequence).unwrap_or(i64::MAX),
                    event.emp_id.as_str(),
                    event.name.as_str(),
                    event.from_grade.to_string(),
                    event.to_grade.to_string(),
                    event.new_designation.as_str(),
                    event.predicted_date.format(iso_date::FORMAT).to_string(),
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO projection_runs (
                run_id,
                reference_date,
                start_year,
                end_year,
                input_hash,
                events_digest,
                num_events,
                num_promotions,
                num_retirements,
                num_pre_horizon_retirements,
                num_unassigned
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                manifest.run_id.as_str(),
                manifest.reference_date.format(iso_date::FORMAT).to_string(),
                manifest.start_year,
                manifest.end_year,
                manifest.input_hash.as_str(),
                manifest.events_digest.as_str(),
                count_to_sql(manifest.num_events),
                count_to_sql(manifest.num_promotions),
                count_to_sql(manifest.num_retirements),
                count_to_sql(manifest.num_pre_horizon_retirements),
                count_to_sql(manifest.num_unassigned),
            ],
        )?;

        tx.commit()?;
        info!(run_id = %manifest.run_id, rows = events.len(), "predictions replaced");
        Ok(())
    }

    /// Number of stored predictions
    pub fn count(&self) -> Result<usize, PersistenceError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Every stored event in emission order
    pub fn all_events(&self) -> Result<Vec<PredictedEvent>, PersistenceError> {
        self.query_events(
            &format!("SELECT {EVENT_COLUMNS} FROM predictions ORDER BY sequence ASC"),
            params![],
        )
    }

    /// Events of one employee, ordered by date then emission order
    pub fn events_for(&self, emp_id: &str) -> Result<Vec<PredictedEvent>, PersistenceError> {
        self.query_events(
            &format!(
                "SELECT {EVENT_COLUMNS}
                 FROM predictions
                 WHERE emp_id = ?1
                 ORDER BY predicted_date ASC, sequence ASC"
            ),
            params![emp_id],
        )
    }

    /// Events of employees whose ID or name contains `query` (case-insensitive)
    pub fn search_events(&self, query: &str) -> Result<Vec<PredictedEvent>, PersistenceError> {
        let pattern = format!("%{}%", query.to_lowercase());
        self.query_events(
            &format!(
                "SELECT {EVENT_COLUMNS}
                 FROM predictions
                 WHERE lower(emp_id) LIKE ?1 OR lower(name) LIKE ?1
                 ORDER BY predicted_date ASC, sequence ASC"
            ),
            params![pattern],
        )
    }

    /// Promotion counts per event year, ascending
    pub fn promotions_per_year(&self) -> Result<Vec<YearlyCount>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT substr(predicted_date, 1, 4) AS year, COUNT(*)
             FROM predictions
             WHERE to_grade != 'RETIRED'
             GROUP BY year
             ORDER BY year ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (year, count) = row?;
            let year = year
                .parse::<i32>()
                .map_err(|_| PersistenceError::InvalidRow(format!("year {year}")))?;
            counts.push(YearlyCount {
                year,
                count: usize::try_from(count).unwrap_or(0),
            });
        }
        Ok(counts)
    }

    /// Manifest of the most recently persisted run
    pub fn latest_run(&self) -> Result<Option<RunManifest>, PersistenceError> {
        let row = self
            .conn
            .query_row(
                "SELECT run_id, reference_date, start_year, end_year, input_hash, events_digest,
                        num_events, num_promotions, num_retirements,
                        num_pre_horizon_retirements, num_unassigned
                 FROM projection_runs
                 ORDER BY rowid DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i32>(2)?,
                        row.get::<_, i32>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        [
                            row.get::<_, i64>(6)?,
                            row.get::<_, i64>(7)?,
                            row.get::<_, i64>(8)?,
                            row.get::<_, i64>(9)?,
                            row.get::<_, i64>(10)?,
                        ],
                    ))
                },
            )
            .optional()?;

        let Some(stored) = row else {
            return Ok(None);
        };
        let (run_id, reference_date, start_year, end_year, input_hash, events_digest, counts) =
            stored;
        let [
            num_events,
            num_promotions,
            num_retirements,
            num_pre_horizon_retirements,
            num_unassigned,
        ] = counts.map(|c| usize::try_from(c).unwrap_or(0));

        Ok(Some(RunManifest {
            run_id,
            reference_date: parse_stored_date(&reference_date)?,
            start_year,
            end_year,
            input_hash,
            events_digest,
            num_events,
            num_promotions,
            num_retirements,
            num_pre_horizon_retirements,
            num_unassigned,
        }))
    }

    fn query_events(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<PredictedEvent>, PersistenceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_event_columns)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(event_from_columns(row?)?);
        }
        Ok(events)
    }
}

type EventColumns = (String, String, String, String, String, String);

fn read_event_columns(row: &Row<'_>) -> rusqlite::Result<EventColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn event_from_columns(columns: EventColumns) -> Result<PredictedEvent, PersistenceError> {
    let (emp_id, name, from_grade, to_grade, new_designation, predicted_date) = columns;
    Ok(PredictedEvent {
        emp_id,
        name,
        from_grade: parse_stored_label(&from_grade)?,
        to_grade: parse_stored_label(&to_grade)?,
        new_designation,
        predicted_date: parse_stored_date(&predicted_date)?,
    })
}

fn parse_stored_label(raw: &str) -> Result<GradeLabel, PersistenceError> {
    raw.parse().map_err(|e: crate::models::event::GradeLabelError| {
        PersistenceError::InvalidRow(e.to_string())
    })
}

fn parse_stored_date(raw: &str) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(raw, iso_date::FORMAT)
        .map_err(|_| PersistenceError::InvalidRow(format!("date {raw}")))
}

fn count_to_sql(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{run_projection_with, ProjectionConfig};

    fn empty_run() -> RunManifest {
        let config = ProjectionConfig {
            reference_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            horizon_years: 1,
        };
        run_projection_with(config, Vec::new(), Vec::new()).unwrap().manifest
    }

    fn stored_runs(store: &PredictionStore) -> i64 {
        store
            .conn
            .query_row("SELECT COUNT(*) FROM projection_runs", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_replace_keeps_only_latest_manifest() {
        let mut store = PredictionStore::open_in_memory().unwrap();
        let first = empty_run();
        let second = empty_run();
        assert_ne!(first.run_id, second.run_id);

        store.replace_predictions(&first, &[]).unwrap();
        store.replace_predictions(&second, &[]).unwrap();

        assert_eq!(stored_runs(&store), 1);
        assert_eq!(store.latest_run().unwrap(), Some(second));
    }
}
