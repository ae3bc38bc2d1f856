use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// One staff member's running stopwatch.
///
/// Wall-clock `started_at` is what ends up in the ledger; the monotonic
/// `anchor` drives the polled elapsed display and keeps it stable across
/// system clock adjustments.
#[derive(Debug, Clone)]
pub struct ActiveTimer {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    pub(crate) anchor: Instant,
}

impl ActiveTimer {
    pub fn begin(task_id: String, started_at: DateTime<Utc>, now: Instant) -> Self {
        Self {
            task_id,
            started_at,
            anchor: now,
        }
    }

    /// Pure query; safe to poll once a second for a stopwatch display.
    /// Stored durations are never derived from this, only from the
    /// wall-clock span computed once at stop.
    pub fn elapsed(&self) -> Duration {
        self.anchor.elapsed()
    }
}

/// Serializable view for the UI stopwatch, recomputed on each poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl TimerSnapshot {
    pub fn of(timer: &ActiveTimer) -> Self {
        Self {
            task_id: timer.task_id.clone(),
            started_at: timer.started_at,
            elapsed_ms: timer.elapsed().as_millis() as u64,
        }
    }
}
