//! praxis: the task/time-tracking core of a practice-management system for
//! an accounting firm.
//!
//! The crate owns four things: the per-staff active-timer registry, the
//! append-only time-log ledger write path, the permissive task status
//! lifecycle, and the pure aggregation views (project rollups, workload and
//! billing metrics). Persistence is a collaborator reached through simple
//! request/response calls on [`db::Database`]; rendering, auth, imports and
//! notifications live outside this crate entirely.

pub mod db;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod rollup;
pub mod settings;
pub mod timer;
mod utils;

pub use db::models::{
    Invoice, InvoiceStatus, Priority, Project, ProjectStatus, Staff, Task, TaskStatus,
    TimeLogEntry,
};
pub use db::Database;
pub use error::{LifecycleError, TimerError};
pub use lifecycle::TransitionEvent;
pub use metrics::BranchFilter;
pub use settings::{BillingSettings, SettingsStore};
pub use timer::{ActorContext, TimerRegistry, TimerSnapshot};

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// Aggregate handle wiring the storage collaborator, the timer registry and
/// configuration together for the host application.
pub struct PracticeCore {
    db: Database,
    timers: TimerRegistry,
    settings: SettingsStore,
}

impl PracticeCore {
    /// Open (or create) the data directory: `praxis.sqlite3` plus
    /// `settings.json`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join("praxis.sqlite3"))?;
        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let timers = TimerRegistry::new(db.clone());

        Ok(Self {
            db,
            timers,
            settings,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Resolve a staff id into the session context timer calls run under.
    pub async fn actor(&self, staff_id: &str) -> Result<ActorContext> {
        let staff = self
            .db
            .get_staff(staff_id)
            .await?
            .ok_or_else(|| anyhow!("staff {staff_id} not found"))?;
        Ok(ActorContext::new(staff.id, staff.name))
    }

    pub async fn clock_in(&self, staff_id: &str) -> Result<()> {
        self.db
            .set_staff_clocked_in(staff_id, Some(Utc::now()))
            .await
    }

    /// Clock out, flushing any in-flight timer to the ledger first so no
    /// tracked time is silently dropped.
    pub async fn clock_out(&self, staff_id: &str) -> Result<Option<TimeLogEntry>> {
        let actor = self.actor(staff_id).await?;
        let flushed = self
            .timers
            .flush(&actor, "Auto-logged at clock-out")
            .await
            .map_err(|err| anyhow!(err))?;

        self.db.set_staff_clocked_in(staff_id, None).await?;
        Ok(flushed)
    }

    /// Apply a status change and persist the result, returning the
    /// transition event for the external audit trail.
    pub async fn update_task_status(
        &self,
        task_id: &str,
        new_status: TaskStatus,
    ) -> Result<TransitionEvent> {
        let task = self
            .db
            .get_task(task_id)
            .await?
            .ok_or_else(|| anyhow!("task {task_id} not found"))?;

        let (updated, event) = lifecycle::apply_status(&task, new_status, Utc::now())
            .map_err(|err| anyhow!(err))?;

        self.db
            .update_task_status(&updated.id, updated.status, updated.sla_progress)
            .await?;
        Ok(event)
    }

    /// Move every past-due task to Overdue and persist the changes.
    /// Returns the ids of the tasks that were flagged.
    pub async fn sweep_overdue(&self) -> Result<Vec<String>> {
        let tasks = self.db.list_tasks().await?;
        let today = Utc::now().date_naive();

        let mut flagged = Vec::new();
        for task in lifecycle::sweep_overdue(&tasks, today) {
            self.db
                .update_task_status(&task.id, task.status, task.sla_progress)
                .await?;
            flagged.push(task.id);
        }
        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn staff_member() -> Staff {
        Staff {
            id: "S001".into(),
            name: "Suresh K".into(),
            role: "Senior Accountant".into(),
            branch: "Ravulapalem".into(),
            hourly_rate: 500.0,
            mtd_tracked_hours: 0.0,
            is_clocked_in: false,
            clock_in_time: None,
        }
    }

    fn gst_task() -> Task {
        Task {
            id: "T001".into(),
            client_id: "C001".into(),
            client_name: "Sri Venkateswara Traders".into(),
            project_id: None,
            service_type: "GSTR-3B".into(),
            period: "May 2024".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            status: TaskStatus::InProgress,
            assignee_id: Some("S001".into()),
            assigned_to: "Suresh K".into(),
            priority: Priority::High,
            branch: "Ravulapalem".into(),
            sla_progress: 45,
            total_tracked_minutes: 120,
        }
    }

    #[tokio::test]
    async fn clock_out_flushes_the_running_timer() {
        let dir = TempDir::new().unwrap();
        let core = PracticeCore::open(dir.path()).unwrap();
        core.db().insert_staff(&staff_member()).await.unwrap();
        core.db().insert_task(&gst_task()).await.unwrap();

        core.clock_in("S001").await.unwrap();
        let clocked = core.db().get_staff("S001").await.unwrap().unwrap();
        assert!(clocked.is_clocked_in);
        assert!(clocked.clock_in_time.is_some());

        let actor = core.actor("S001").await.unwrap();
        core.timers().start(&actor, "T001").await.unwrap();

        let flushed = core.clock_out("S001").await.unwrap();
        assert!(flushed.is_some());

        let logs = core.db().list_time_logs_for_task("T001").await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].description, "Auto-logged at clock-out");

        let off_duty = core.db().get_staff("S001").await.unwrap().unwrap();
        assert!(!off_duty.is_clocked_in);
        assert!(off_duty.clock_in_time.is_none());
    }

    #[tokio::test]
    async fn clock_out_without_a_timer_just_clocks_out() {
        let dir = TempDir::new().unwrap();
        let core = PracticeCore::open(dir.path()).unwrap();
        core.db().insert_staff(&staff_member()).await.unwrap();

        core.clock_in("S001").await.unwrap();
        let flushed = core.clock_out("S001").await.unwrap();
        assert!(flushed.is_none());
    }

    #[tokio::test]
    async fn status_update_persists_derived_fields_and_reports_event() {
        let dir = TempDir::new().unwrap();
        let core = PracticeCore::open(dir.path()).unwrap();
        core.db().insert_task(&gst_task()).await.unwrap();

        let event = core
            .update_task_status("T001", TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(event.from, TaskStatus::InProgress);
        assert_eq!(event.to, TaskStatus::Completed);

        let stored = core.db().get_task("T001").await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.sla_progress, 100);
        // Tracked time is untouched by the transition.
        assert_eq!(stored.total_tracked_minutes, 120);
    }
}
