//! Project rollups: progress, resource burn, and yield derived on demand
//! from the current task snapshot. Nothing here caches or mutates; callers
//! re-run these whenever they need fresh figures.

use crate::db::models::{Project, Task};

fn project_tasks<'a>(project_id: &str, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> {
    let project_id = project_id.to_string();
    tasks
        .iter()
        .filter(move |task| task.project_id.as_deref() == Some(project_id.as_str()))
}

/// Completion percentage: completed-or-filed children over all children,
/// rounded. A project with no tasks reads 0, not a division error.
pub fn progress(project_id: &str, tasks: &[Task]) -> u8 {
    let mut total = 0usize;
    let mut done = 0usize;
    for task in project_tasks(project_id, tasks) {
        total += 1;
        if task.status.is_terminal() {
            done += 1;
        }
    }

    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Hours consumed against the project, from the children's tracked minutes.
pub fn resource_burn_hours(project_id: &str, tasks: &[Task]) -> f64 {
    project_tasks(project_id, tasks)
        .map(|task| task.total_tracked_minutes as f64 / 60.0)
        .sum()
}

/// Budgeted revenue minus cost of labor consumed, at the configured flat
/// hourly cost rate (`BillingSettings::flat_hourly_cost_rate`).
pub fn yield_margin(project: &Project, tasks: &[Task], hourly_cost_rate: f64) -> f64 {
    project.budget - resource_burn_hours(&project.id, tasks) * hourly_cost_rate
}

/// Yield as a share of budget, zero when there is no budget to divide by.
pub fn margin_percent(project: &Project, tasks: &[Task], hourly_cost_rate: f64) -> f64 {
    if project.budget == 0.0 {
        return 0.0;
    }
    yield_margin(project, tasks, hourly_cost_rate) / project.budget * 100.0
}
