//! Task handles — live references to scheduled units of work.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::job::ScheduleJob;

/// Coarse lifecycle state of a task handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The task is live and executing (or ready to execute) its job.
    Running,
    /// The task was shut down and will not run again.
    Shutdown,
    /// The task hit an unrecoverable error.
    Failed,
}

impl TaskState {
    /// Check if the handle still refers to live work.
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Shutdown => "shutdown",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A live handle to a unit of scheduled work.
///
/// Tasks are materialized by a [`Worker`](crate::worker::Worker) and tracked
/// in the scheduler's task table; what a task actually executes is the
/// worker's concern and invisible at this layer. The handle supports swapping
/// the job descriptor, reloading from the swapped descriptor, and shutdown.
#[async_trait]
pub trait Task: Send + Sync {
    /// Identity of this task, unique within its worker.
    fn id(&self) -> &str;

    /// Identity of the worker hosting the task.
    fn worker_id(&self) -> &str;

    /// Identity of the scheduler that requested the task, as passed to
    /// [`Worker::create_task`](crate::worker::Worker::create_task).
    fn scheduler_id(&self) -> &str;

    /// The job descriptor the task currently holds.
    fn job(&self) -> ScheduleJob;

    /// Coarse lifecycle state of the task.
    fn state(&self) -> TaskState;

    /// Replace the job descriptor. Takes effect on the next [`reload`](Task::reload).
    async fn set_job(&self, job: ScheduleJob) -> Result<(), TaskError>;

    /// Re-read the descriptor and restart the underlying work from it.
    async fn reload(&self) -> Result<(), TaskError>;

    /// Stop the task and release whatever it holds.
    async fn shutdown(&self) -> Result<(), TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(TaskState::Running.to_string(), "running");
        assert_eq!(TaskState::Shutdown.to_string(), "shutdown");
        assert_eq!(TaskState::Failed.to_string(), "failed");
    }

    #[test]
    fn state_liveness() {
        assert!(TaskState::Running.is_alive());
        assert!(!TaskState::Shutdown.is_alive());
        assert!(!TaskState::Failed.is_alive());
    }

    #[test]
    fn state_serde_roundtrip() {
        let json = serde_json::to_string(&TaskState::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let parsed: TaskState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TaskState::Running);
    }
}
