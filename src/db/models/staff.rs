use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A staff member of the firm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: String,
    pub branch: String,
    /// Billing rate for payroll display; project yield uses the flat
    /// configured cost rate instead (see `BillingSettings`).
    pub hourly_rate: f64,
    pub mtd_tracked_hours: f64,
    pub is_clocked_in: bool,
    pub clock_in_time: Option<DateTime<Utc>>,
}
