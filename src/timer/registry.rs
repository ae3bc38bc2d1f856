use std::{collections::HashMap, sync::Arc, time::{Duration, Instant}};

use anyhow::anyhow;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    db::{models::TimeLogEntry, Database},
    error::TimerError,
    log_info, log_warn,
};

use super::{ActiveTimer, TimerSnapshot};

const ENABLE_LOGS: bool = true;

/// The staff session a timer action runs under. Timer state is keyed by
/// `staff_id`, never global: two staff members tracking at once do not see
/// each other's timers.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub staff_id: String,
    pub staff_name: String,
}

impl ActorContext {
    pub fn new(staff_id: impl Into<String>, staff_name: impl Into<String>) -> Self {
        Self {
            staff_id: staff_id.into(),
            staff_name: staff_name.into(),
        }
    }
}

/// Per-staff active timers plus the ledger write path.
///
/// At most one timer per actor; a second `start` is rejected rather than
/// silently replacing the first. `stop` persists the ledger entry and the
/// task-minutes bump first and only then clears the in-memory timer, so a
/// storage failure leaves the timer running and the stop retryable.
#[derive(Clone)]
pub struct TimerRegistry {
    db: Database,
    timers: Arc<Mutex<HashMap<String, ActiveTimer>>>,
}

impl TimerRegistry {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn start(
        &self,
        actor: &ActorContext,
        task_id: &str,
    ) -> Result<TimerSnapshot, TimerError> {
        let mut timers = self.timers.lock().await;

        if let Some(active) = timers.get(&actor.staff_id) {
            return Err(TimerError::AlreadyRunning {
                task_id: active.task_id.clone(),
            });
        }

        let task = self
            .db
            .get_task(task_id)
            .await?
            .ok_or_else(|| anyhow!("task {task_id} not found"))?;

        let timer = ActiveTimer::begin(task.id.clone(), Utc::now(), Instant::now());
        let snapshot = TimerSnapshot::of(&timer);
        timers.insert(actor.staff_id.clone(), timer);

        log_info!("Timer started on task {} by {}", task.id, actor.staff_id);
        Ok(snapshot)
    }

    /// Stop the running timer and append the work session to the ledger.
    ///
    /// The entry's duration comes from the wall-clock span, computed once
    /// here; the display anchor plays no part in what gets stored.
    pub async fn stop(
        &self,
        actor: &ActorContext,
        description: &str,
    ) -> Result<TimeLogEntry, TimerError> {
        let mut timers = self.timers.lock().await;

        let active = timers
            .get(&actor.staff_id)
            .cloned()
            .ok_or(TimerError::NotRunning)?;

        let mut ended_at = Utc::now();
        if ended_at <= active.started_at {
            // A stop landing in the starting millisecond still records a
            // forward span.
            ended_at = active.started_at + chrono::Duration::milliseconds(1);
        }

        let entry = TimeLogEntry::from_span(
            &active.task_id,
            &actor.staff_id,
            &actor.staff_name,
            active.started_at,
            ended_at,
            description,
        )?;

        // Persist-then-clear: the map entry survives a failed write.
        self.db.append_work_session(&entry).await?;
        timers.remove(&actor.staff_id);

        log_info!(
            "Timer stopped on task {}: {} minute(s) logged for {}",
            entry.task_id, entry.duration_minutes, actor.staff_id
        );
        Ok(entry)
    }

    /// Elapsed time of the actor's running timer, zero when idle. Harmless
    /// query: polling it drives the stopwatch display.
    pub async fn elapsed(&self, actor: &ActorContext) -> Duration {
        let timers = self.timers.lock().await;
        timers
            .get(&actor.staff_id)
            .map(|timer| timer.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    pub async fn snapshot(&self, actor: &ActorContext) -> Option<TimerSnapshot> {
        let timers = self.timers.lock().await;
        timers.get(&actor.staff_id).map(TimerSnapshot::of)
    }

    /// Force-clear without writing a ledger entry. Elapsed time is lost;
    /// this is the explicit correction path, not the clock-out path.
    pub async fn discard(&self, actor: &ActorContext) -> Option<ActiveTimer> {
        let mut timers = self.timers.lock().await;
        let dropped = timers.remove(&actor.staff_id);
        if let Some(timer) = &dropped {
            log_warn!(
                "Discarded running timer on task {} for {} without logging",
                timer.task_id, actor.staff_id
            );
        }
        dropped
    }

    /// Stop-and-log if a timer is running, no-op otherwise. Clock-out calls
    /// this so in-flight time always reaches the ledger.
    pub async fn flush(
        &self,
        actor: &ActorContext,
        description: &str,
    ) -> Result<Option<TimeLogEntry>, TimerError> {
        match self.stop(actor, description).await {
            Ok(entry) => Ok(Some(entry)),
            Err(TimerError::NotRunning) => Ok(None),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) async fn backdate_for_test(&self, actor: &ActorContext, by: chrono::Duration) {
        let mut timers = self.timers.lock().await;
        if let Some(timer) = timers.get_mut(&actor.staff_id) {
            timer.started_at -= by;
        }
    }
}
