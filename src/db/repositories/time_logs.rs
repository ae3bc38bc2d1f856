//! Ledger access. Insert and read only: entries are never updated or
//! deleted, corrections are appended as their own entries.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{parse_datetime, to_i64, to_u64},
    models::TimeLogEntry,
    Database,
};

fn row_to_entry(row: &Row) -> Result<TimeLogEntry> {
    let started_at: String = row.get("started_at")?;
    let ended_at: String = row.get("ended_at")?;
    let duration_minutes: i64 = row.get("duration_minutes")?;

    Ok(TimeLogEntry {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        staff_id: row.get("staff_id")?,
        staff_name: row.get("staff_name")?,
        started_at: parse_datetime(&started_at, "started_at")?,
        ended_at: parse_datetime(&ended_at, "ended_at")?,
        duration_minutes: to_u64(duration_minutes, "duration_minutes")?,
        description: row.get("description")?,
    })
}

impl Database {
    /// The stop-timer write path: append the ledger entry and bump the
    /// owning task's tracked minutes by exactly the entry's duration, in a
    /// single transaction. Either both land or neither does.
    pub async fn append_work_session(&self, entry: &TimeLogEntry) -> Result<()> {
        let record = entry.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO time_logs (id, task_id, staff_id, staff_name, started_at,
                     ended_at, duration_minutes, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.task_id,
                    record.staff_id,
                    record.staff_name,
                    record.started_at.to_rfc3339(),
                    record.ended_at.to_rfc3339(),
                    to_i64(record.duration_minutes)?,
                    record.description,
                ],
            )?;

            let updated = tx.execute(
                "UPDATE tasks
                 SET total_tracked_minutes = total_tracked_minutes + ?1
                 WHERE id = ?2",
                params![to_i64(record.duration_minutes)?, record.task_id],
            )?;
            if updated == 0 {
                anyhow::bail!("task {} not found for work session", record.task_id);
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn list_time_logs_for_task(&self, task_id: &str) -> Result<Vec<TimeLogEntry>> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_id, staff_id, staff_name, started_at, ended_at,
                        duration_minutes, description
                 FROM time_logs
                 WHERE task_id = ?1
                 ORDER BY started_at",
            )?;

            let mut rows = stmt.query(params![task_id])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }
            Ok(entries)
        })
        .await
    }

    /// Entries for one staff member whose start falls in `[from, to)`.
    /// The month-to-date aggregate is computed from this.
    pub async fn list_time_logs_for_staff(
        &self,
        staff_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeLogEntry>> {
        let staff_id = staff_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_id, staff_id, staff_name, started_at, ended_at,
                        duration_minutes, description
                 FROM time_logs
                 WHERE staff_id = ?1 AND started_at >= ?2 AND started_at < ?3
                 ORDER BY started_at",
            )?;

            let mut rows = stmt.query(params![
                staff_id,
                from.to_rfc3339(),
                to.to_rfc3339()
            ])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }
            Ok(entries)
        })
        .await
    }
}
