//! Task status lifecycle.
//!
//! The machine is deliberately permissive: staff can select any status from
//! any other, including moving a Completed task back, because manual
//! correction is part of the workflow. What stays centralized here is the
//! recomputation of derived fields on every transition and the
//! `TransitionEvent` handed to the external audit collaborator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::models::{Task, TaskStatus};
use crate::error::LifecycleError;

/// What changed, for the audit/history collaborator. The core emits it; it
/// does not persist history itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub at: DateTime<Utc>,
}

/// Pure transform: returns the task with the new status and derived fields
/// recomputed. Tracked minutes are never touched here.
pub fn apply_status(
    task: &Task,
    new_status: TaskStatus,
    at: DateTime<Utc>,
) -> Result<(Task, TransitionEvent), LifecycleError> {
    let mut updated = task.clone();
    updated.status = new_status;

    // Reaching a terminal state means the SLA obligation is met in full.
    if new_status.is_terminal() {
        updated.sla_progress = 100;
    }

    let event = TransitionEvent {
        task_id: task.id.clone(),
        from: task.status,
        to: new_status,
        at,
    };

    Ok((updated, event))
}

/// A task is past due when its deadline has passed without reaching a
/// terminal status. The Overdue status itself still counts as past due.
pub fn is_past_due(task: &Task, today: NaiveDate) -> bool {
    !task.status.is_terminal() && task.due_date < today
}

/// Move every newly past-due task to Overdue, returning updated copies of
/// only the tasks that changed (callers persist those). Tasks already
/// Overdue, and terminal tasks, come back unchanged and excluded.
pub fn sweep_overdue(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Overdue && is_past_due(task, today))
        .map(|task| {
            let mut updated = task.clone();
            updated.status = TaskStatus::Overdue;
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Priority;

    fn task_with(id: &str, status: TaskStatus, due: NaiveDate) -> Task {
        Task {
            id: id.to_string(),
            client_id: "C001".into(),
            client_name: "Krishna & Co.".into(),
            project_id: None,
            service_type: "Tax Audit".into(),
            period: "FY 23-24".into(),
            due_date: due,
            status,
            assignee_id: Some("S002".into()),
            assigned_to: "Priya D".into(),
            priority: Priority::High,
            branch: "Amalapuram".into(),
            sla_progress: 40,
            total_tracked_minutes: 95,
        }
    }

    fn due(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn terminal_statuses_force_full_sla() {
        let task = task_with("T007", TaskStatus::UnderReview, due(2024, 6, 20));

        for terminal in [TaskStatus::Completed, TaskStatus::Filed] {
            let (updated, event) = apply_status(&task, terminal, Utc::now()).unwrap();
            assert_eq!(updated.sla_progress, 100);
            assert_eq!(event.from, TaskStatus::UnderReview);
            assert_eq!(event.to, terminal);
        }
    }

    #[test]
    fn non_terminal_transitions_keep_sla_and_minutes() {
        let task = task_with("T007", TaskStatus::New, due(2024, 6, 20));
        let (updated, _) =
            apply_status(&task, TaskStatus::PendingClient, Utc::now()).unwrap();

        assert_eq!(updated.sla_progress, 40);
        assert_eq!(updated.total_tracked_minutes, 95);
    }

    #[test]
    fn manual_correction_out_of_terminal_is_allowed() {
        let task = task_with("T001", TaskStatus::Completed, due(2024, 6, 20));
        let (updated, event) =
            apply_status(&task, TaskStatus::InProgress, Utc::now()).unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(event.from, TaskStatus::Completed);
    }

    #[test]
    fn overdue_sweep_skips_terminal_and_already_overdue() {
        let today = due(2024, 7, 1);
        let tasks = vec![
            task_with("late", TaskStatus::InProgress, due(2024, 6, 11)),
            task_with("done", TaskStatus::Filed, due(2024, 6, 11)),
            task_with("flagged", TaskStatus::Overdue, due(2024, 6, 11)),
            task_with("future", TaskStatus::New, due(2024, 9, 30)),
        ];

        let swept = sweep_overdue(&tasks, today);

        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].id, "late");
        assert_eq!(swept[0].status, TaskStatus::Overdue);
        // Entering Overdue must not reset tracked time.
        assert_eq!(swept[0].total_tracked_minutes, 95);
    }

    #[test]
    fn due_today_is_not_past_due() {
        let today = due(2024, 7, 31);
        let task = task_with("T002", TaskStatus::InProgress, today);
        assert!(!is_past_due(&task, today));
    }
}
