use thiserror::Error;

/// Failures surfaced by the per-staff timer registry. These are local and
/// recoverable: the caller (a UI action handler) decides whether to prompt
/// or retry.
#[derive(Debug, Error)]
pub enum TimerError {
    /// Strict single-timer policy: the running timer must be stopped (or
    /// discarded) before another can start.
    #[error("a timer is already running for task {task_id}")]
    AlreadyRunning { task_id: String },

    #[error("no active timer for this session")]
    NotRunning,

    /// The backing store rejected the write. The in-memory timer is left
    /// running so the stop can be retried without losing the session.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The lifecycle is permissive today (any status may be selected from any
/// other), so no variant is ever produced; the type keeps room for a strict
/// transition table without breaking the `apply_status` signature.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}
