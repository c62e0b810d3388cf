//! Run manifest
//!
//! Every completed run is described by a manifest: which years it covered,
//! what it produced, and two SHA-256 fingerprints.
//!
//! - `input_hash` covers roster, catalog and config. Two runs with the same
//!   input hash must produce the same events.
//! - `events_digest` covers the event list in emission order, so two runs can
//!   be compared without diffing their output.
//!
//! # Critical Invariants
//!
//! - **Determinism**: equal inputs give equal `events_digest`
//! - **Canonical form**: hashing is independent of map iteration order

use crate::models::event::{iso_date, PredictedEvent};
use crate::orchestrator::ProjectionError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Summary of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique identifier of this run (UUID v4)
    pub run_id: String,

    /// Date the run was anchored at
    #[serde(with = "iso_date")]
    pub reference_date: NaiveDate,

    /// First simulated year
    pub start_year: i32,

    /// Last simulated year (inclusive)
    pub end_year: i32,

    /// SHA-256 of canonical roster + catalog + config JSON
    pub input_hash: String,

    /// SHA-256 of the emitted event list
    pub events_digest: String,

    pub num_events: usize,

    pub num_promotions: usize,

    pub num_retirements: usize,

    /// Employees already retired before the first window opened
    pub num_pre_horizon_retirements: usize,

    /// Employees with no matching post
    pub num_unassigned: usize,
}

/// Create a fresh run identifier
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Compute deterministic SHA-256 hash of any serializable value
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on map iteration order.
pub fn compute_input_hash<T: Serialize>(value: &T) -> Result<String, ProjectionError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value)
        .map_err(|e| ProjectionError::Serialization(format!("Input serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| ProjectionError::Serialization(format!("Input serialization failed: {}", e)))?;

    Ok(sha256_hex(json.as_bytes()))
}

/// Digest of an event list in emission order
pub fn compute_events_digest(events: &[PredictedEvent]) -> Result<String, ProjectionError> {
    let json = serde_json::to_string(events)
        .map_err(|e| ProjectionError::Serialization(format!("Event serialization failed: {}", e)))?;
    Ok(sha256_hex(json.as_bytes()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
