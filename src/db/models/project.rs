use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::Priority;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Archived => "Archived",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Planning" => Some(ProjectStatus::Planning),
            "In Progress" => Some(ProjectStatus::InProgress),
            "On Hold" => Some(ProjectStatus::OnHold),
            "Completed" => Some(ProjectStatus::Completed),
            "Archived" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }
}

/// A multi-task engagement with a budget. Progress and profitability are
/// derived from child tasks by `crate::rollup`, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub client_name: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub manager: String,
    pub branch: String,
    pub priority: Priority,
    pub budget: f64,
    pub total_hours_tracked: f64,
}
