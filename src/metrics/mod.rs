//! Workload and billing aggregates for dashboards.
//!
//! Everything here is a pure function over snapshots the caller supplies;
//! the same inputs always produce the same output, and malformed references
//! (a task pointing at an unknown staff id or project) are excluded rather
//! than treated as fatal. Ratio computations guard their denominators and
//! degrade to zero.

mod types;

pub use types::{BranchFilter, DashboardKpis, StaffWorkload, StatusDistribution};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::db::models::{Invoice, InvoiceStatus, Staff, Task, TimeLogEntry};
use crate::lifecycle::is_past_due;

/// Pending-task counts per staff member, branch-filtered.
///
/// Joined strictly on `Task::assignee_id`; display names play no part. The
/// whole filtered roster is reported, zero counts included, so callers can
/// decide what to chart.
pub fn pending_by_staff(
    tasks: &[Task],
    staff: &[Staff],
    filter: &BranchFilter,
) -> Vec<StaffWorkload> {
    let tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| filter.matches(&task.branch))
        .collect();

    staff
        .iter()
        .filter(|member| filter.matches(&member.branch))
        .map(|member| {
            let pending = tasks
                .iter()
                .filter(|task| {
                    task.assignee_id.as_deref() == Some(member.id.as_str())
                        && !task.status.is_terminal()
                })
                .count();
            StaffWorkload {
                staff_id: member.id.clone(),
                staff_name: member.name.clone(),
                pending_tasks: pending,
            }
        })
        .collect()
}

/// Status histogram over the given tasks. Pure; calling it twice on the
/// same snapshot yields the same map.
pub fn status_distribution(tasks: &[Task]) -> StatusDistribution {
    let mut counts = StatusDistribution::new();
    for task in tasks {
        *counts.entry(task.status).or_insert(0) += 1;
    }
    counts
}

/// Tasks whose deadline has passed without reaching a terminal status.
pub fn overdue_count(tasks: &[Task], today: NaiveDate) -> usize {
    tasks.iter().filter(|task| is_past_due(task, today)).count()
}

/// Tasks due inside the window `[today, today + days]`, soonest first.
pub fn upcoming_deadlines<'a>(tasks: &'a [Task], today: NaiveDate, days: i64) -> Vec<&'a Task> {
    let horizon = today + chrono::Duration::days(days);
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.due_date >= today && task.due_date <= horizon)
        .collect();
    upcoming.sort_by_key(|task| task.due_date);
    upcoming
}

/// Paid amount over total billed, in percent. Nothing billed reads 0.
pub fn collection_rate(invoices: &[Invoice]) -> f64 {
    let billed: f64 = invoices.iter().map(|invoice| invoice.amount).sum();
    if billed == 0.0 {
        return 0.0;
    }

    let paid: f64 = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(|invoice| invoice.amount)
        .sum();
    paid / billed * 100.0
}

/// Sum of paid invoice amounts (the revenue KPI tile).
pub fn paid_revenue(invoices: &[Invoice]) -> f64 {
    invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(|invoice| invoice.amount)
        .sum()
}

/// Month-to-date tracked hours for one staff member, from ledger entries.
/// The window is the start of `now`'s calendar month (UTC) up to `now`.
pub fn mtd_tracked_hours(logs: &[TimeLogEntry], staff_id: &str, now: DateTime<Utc>) -> f64 {
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);

    let minutes: u64 = logs
        .iter()
        .filter(|entry| {
            entry.staff_id == staff_id
                && entry.started_at >= month_start
                && entry.started_at <= now
        })
        .map(|entry| entry.duration_minutes)
        .sum();
    minutes as f64 / 60.0
}

/// Branch-filtered headline KPIs for the dashboard.
pub fn dashboard_kpis(
    tasks: &[Task],
    invoices: &[Invoice],
    today: NaiveDate,
    filter: &BranchFilter,
) -> DashboardKpis {
    let tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| filter.matches(&task.branch))
        .collect();

    let total_tasks = tasks.len();
    let pending_tasks = tasks
        .iter()
        .filter(|task| !task.status.is_terminal())
        .count();
    let overdue_tasks = tasks
        .iter()
        .filter(|task| is_past_due(task, today))
        .count();
    let paid_revenue = paid_revenue(invoices);

    let pending_share = if total_tasks == 0 {
        0.0
    } else {
        pending_tasks as f64 / total_tasks as f64 * 100.0
    };

    DashboardKpis {
        total_tasks,
        pending_tasks,
        overdue_tasks,
        paid_revenue,
        pending_share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Priority, TaskStatus};
    use chrono::TimeZone;

    fn task(id: &str, branch: &str, assignee: Option<&str>, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            client_id: "C001".into(),
            client_name: "Client".into(),
            project_id: None,
            service_type: "GSTR-3B".into(),
            period: "May 2024".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            status,
            assignee_id: assignee.map(str::to_string),
            assigned_to: String::new(),
            priority: Priority::Medium,
            branch: branch.to_string(),
            sla_progress: 0,
            total_tracked_minutes: 0,
        }
    }

    fn member(id: &str, name: &str, branch: &str) -> Staff {
        Staff {
            id: id.to_string(),
            name: name.to_string(),
            role: "Accountant".into(),
            branch: branch.to_string(),
            hourly_rate: 500.0,
            mtd_tracked_hours: 0.0,
            is_clocked_in: false,
            clock_in_time: None,
        }
    }

    fn invoice(id: &str, amount: f64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: id.to_string(),
            client_id: "C001".into(),
            client_name: "Client".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount,
            status,
            items: Vec::new(),
        }
    }

    #[test]
    fn pending_counts_join_on_id_and_respect_branch() {
        let tasks = vec![
            task("t1", "Ravulapalem", Some("S001"), TaskStatus::InProgress),
            task("t2", "Ravulapalem", Some("S001"), TaskStatus::Completed),
            task("t3", "Amalapuram", Some("S001"), TaskStatus::New),
            task("t4", "Ravulapalem", Some("S999"), TaskStatus::New),
            task("t5", "Ravulapalem", None, TaskStatus::New),
        ];
        let staff = vec![
            member("S001", "Suresh K", "Ravulapalem"),
            member("S002", "Priya D", "Ravulapalem"),
            member("S003", "Mahesh B", "Versatile"),
        ];

        let filter = BranchFilter::Branch("Ravulapalem".into());
        let workload = pending_by_staff(&tasks, &staff, &filter);

        // Off-branch staff are excluded, zero counts are kept.
        assert_eq!(workload.len(), 2);
        assert_eq!(workload[0].staff_id, "S001");
        assert_eq!(workload[0].pending_tasks, 1);
        assert_eq!(workload[1].staff_id, "S002");
        assert_eq!(workload[1].pending_tasks, 0);
    }

    #[test]
    fn all_branches_filter_spans_the_firm() {
        let tasks = vec![
            task("t1", "Ravulapalem", Some("S001"), TaskStatus::InProgress),
            task("t3", "Amalapuram", Some("S001"), TaskStatus::New),
        ];
        let staff = vec![member("S001", "Suresh K", "Ravulapalem")];

        let workload = pending_by_staff(&tasks, &staff, &BranchFilter::All);
        assert_eq!(workload[0].pending_tasks, 2);
    }

    #[test]
    fn status_distribution_is_stable_across_calls() {
        let tasks = vec![
            task("t1", "Ravulapalem", None, TaskStatus::Completed),
            task("t2", "Ravulapalem", None, TaskStatus::Completed),
            task("t3", "Ravulapalem", None, TaskStatus::InProgress),
        ];

        let first = status_distribution(&tasks);
        let second = status_distribution(&tasks);

        assert_eq!(first, second);
        assert_eq!(first[&TaskStatus::Completed], 2);
        assert_eq!(first[&TaskStatus::InProgress], 1);
        assert_eq!(first.get(&TaskStatus::Filed), None);
    }

    #[test]
    fn deadline_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut due_soon = task("soon", "Ravulapalem", None, TaskStatus::New);
        due_soon.due_date = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let mut far = task("far", "Ravulapalem", None, TaskStatus::New);
        far.due_date = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        let mut late = task("late", "Ravulapalem", None, TaskStatus::InProgress);
        late.due_date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let mut done_late = task("done", "Ravulapalem", None, TaskStatus::Filed);
        done_late.due_date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();

        let tasks = vec![due_soon, far, late, done_late];

        assert_eq!(overdue_count(&tasks, today), 1);

        let upcoming = upcoming_deadlines(&tasks, today, 7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, "soon");
    }

    #[test]
    fn collection_rate_guards_zero_billing() {
        assert_eq!(collection_rate(&[]), 0.0);

        let invoices = vec![
            invoice("i1", 3000.0, InvoiceStatus::Paid),
            invoice("i2", 1000.0, InvoiceStatus::Unpaid),
        ];
        assert_eq!(collection_rate(&invoices), 75.0);
        assert_eq!(paid_revenue(&invoices), 3000.0);
    }

    #[test]
    fn mtd_hours_window_resets_at_month_start() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let in_month = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2024, 5, 28, 9, 0, 0).unwrap();

        let logs = vec![
            TimeLogEntry::from_span("T001", "S001", "Suresh K", in_month,
                in_month + chrono::Duration::minutes(90), "").unwrap(),
            TimeLogEntry::from_span("T001", "S001", "Suresh K", last_month,
                last_month + chrono::Duration::minutes(600), "").unwrap(),
            TimeLogEntry::from_span("T001", "S002", "Priya D", in_month,
                in_month + chrono::Duration::minutes(60), "").unwrap(),
        ];

        assert_eq!(mtd_tracked_hours(&logs, "S001", now), 1.5);
    }

    #[test]
    fn kpis_degrade_to_zero_on_empty_input() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let kpis = dashboard_kpis(&[], &[], today, &BranchFilter::All);

        assert_eq!(kpis.total_tasks, 0);
        assert_eq!(kpis.pending_share, 0.0);
        assert_eq!(kpis.paid_revenue, 0.0);
    }
}
