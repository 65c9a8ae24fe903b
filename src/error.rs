//! Error types for the scheduler core.

/// Top-level error type for the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// Errors raised by the scheduling paths themselves.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// No registered worker declares support for the requested executor type.
    /// Reported to the caller as-is; never retried at this layer.
    #[error("unsupported executor: {executor}")]
    UnsupportedExecutor { executor: String },
}

/// Errors produced by worker collaborators.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Worker {worker} capability query failed: {reason}")]
    CapabilityQuery { worker: String, reason: String },

    #[error("Worker {worker} failed to create task for node {node}: {reason}")]
    TaskCreation {
        worker: String,
        node: String,
        reason: String,
    },

    #[error("Worker {worker} unavailable: {reason}")]
    Unavailable { worker: String, reason: String },
}

/// Errors produced by task collaborators.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task {task} rejected job update: {reason}")]
    SetJob { task: String, reason: String },

    #[error("Task {task} reload failed: {reason}")]
    Reload { task: String, reason: String },

    #[error("Task {task} shutdown failed: {reason}")]
    Shutdown { task: String, reason: String },
}

/// Result type alias for the scheduler.
pub type Result<T> = std::result::Result<T, Error>;
