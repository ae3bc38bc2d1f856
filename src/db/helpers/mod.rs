use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::{InvoiceStatus, Priority, ProjectStatus, TaskStatus};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_task_status(value: &str) -> Result<TaskStatus> {
    TaskStatus::from_str(value).ok_or_else(|| anyhow!("unknown task status '{value}'"))
}

pub fn parse_project_status(value: &str) -> Result<ProjectStatus> {
    ProjectStatus::from_str(value).ok_or_else(|| anyhow!("unknown project status '{value}'"))
}

pub fn parse_priority(value: &str) -> Result<Priority> {
    Priority::from_str(value).ok_or_else(|| anyhow!("unknown priority '{value}'"))
}

pub fn parse_invoice_status(value: &str) -> Result<InvoiceStatus> {
    InvoiceStatus::from_str(value).ok_or_else(|| anyhow!("unknown invoice status '{value}'"))
}

/// Invoice line items are stored as a JSON array in a TEXT column.
pub fn items_to_json(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("failed to encode invoice items")
}

pub fn items_from_json(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).context("failed to decode invoice items")
}

/// SLA progress is stored as an INTEGER; clamp on the way out so a bad row
/// cannot produce an out-of-range percentage.
pub fn to_sla(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}
