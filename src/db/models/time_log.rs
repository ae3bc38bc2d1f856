//! Time-log ledger entries.
//!
//! The ledger is append-only: entries are immutable once written, and
//! corrections are made by appending adjusting entries, never by editing
//! history. `TimeLogEntry::from_span` is the only constructor, so
//! `duration_minutes` can never diverge from the recorded span.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One discrete work session against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogEntry {
    pub id: String,
    pub task_id: String,
    pub staff_id: String,
    /// Denormalized for display; `staff_id` is the reference.
    pub staff_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: u64,
    pub description: String,
}

impl TimeLogEntry {
    /// Build an entry from a recorded span, deriving `duration_minutes` as
    /// whole minutes (floor). Rejects spans that do not move forward.
    pub fn from_span(
        task_id: &str,
        staff_id: &str,
        staff_name: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        description: &str,
    ) -> Result<Self> {
        if ended_at <= started_at {
            bail!(
                "time log span must move forward (started {started_at}, ended {ended_at})"
            );
        }

        let duration_minutes = (ended_at - started_at).num_minutes() as u64;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
            staff_id: staff_id.to_string(),
            staff_name: staff_name.to_string(),
            started_at,
            ended_at,
            duration_minutes,
            description: description.to_string(),
        })
    }
}
