//! Task records and the status vocabulary shared with the backing store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow states a task can occupy.
///
/// Transitions are deliberately unrestricted (staff can correct a status by
/// selecting any other); `crate::lifecycle` is the one place derived fields
/// get recomputed when a status changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Pending Client")]
    PendingClient,
    #[serde(rename = "Under Review")]
    UnderReview,
    Filed,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::PendingClient => "Pending Client",
            TaskStatus::UnderReview => "Under Review",
            TaskStatus::Filed => "Filed",
            TaskStatus::Completed => "Completed",
            TaskStatus::Overdue => "Overdue",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "New" => Some(TaskStatus::New),
            "In Progress" => Some(TaskStatus::InProgress),
            "Pending Client" => Some(TaskStatus::PendingClient),
            "Under Review" => Some(TaskStatus::UnderReview),
            "Filed" => Some(TaskStatus::Filed),
            "Completed" => Some(TaskStatus::Completed),
            "Overdue" => Some(TaskStatus::Overdue),
            _ => None,
        }
    }

    /// Completed and Filed count as done everywhere aggregates are computed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Filed)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A unit of client work (an engagement in the firm's language).
///
/// `assignee_id` is the join key to `Staff`; `assigned_to` is only a cached
/// display name and must never be used for joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub project_id: Option<String>,
    pub service_type: String,
    pub period: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub assignee_id: Option<String>,
    /// Cached staff display name; empty string = unassigned.
    pub assigned_to: String,
    pub priority: Priority,
    pub branch: String,
    /// 0–100, forced to 100 when the task reaches a terminal status.
    pub sla_progress: u8,
    /// Whole minutes accumulated from the time-log ledger. Only grows,
    /// except through explicit correction paths in the backing store.
    pub total_tracked_minutes: u64,
}

impl Task {
    pub fn tracked_hours(&self) -> f64 {
        self.total_tracked_minutes as f64 / 60.0
    }
}
