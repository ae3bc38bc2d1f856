use serde::{Deserialize, Serialize};

use crate::db::models::TaskStatus;
use std::collections::BTreeMap;

/// Branch scoping for dashboard aggregates. Branch values are opaque
/// strings owned by the backing store; `All` is the whole-firm view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchFilter {
    All,
    Branch(String),
}

impl BranchFilter {
    pub fn matches(&self, branch: &str) -> bool {
        match self {
            BranchFilter::All => true,
            BranchFilter::Branch(name) => name == branch,
        }
    }
}

/// Pending-task count for one staff member, joined on staff id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWorkload {
    pub staff_id: String,
    pub staff_name: String,
    pub pending_tasks: usize,
}

/// Ordered status histogram.
pub type StatusDistribution = BTreeMap<TaskStatus, usize>;

/// Headline figures for the dashboard, branch-filtered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub paid_revenue: f64,
    /// Pending tasks as a share of the filtered workload, in percent.
    pub pending_share: f64,
}
