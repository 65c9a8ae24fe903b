//! Scheduler — orchestration over workers, tasks, and the task table.
//!
//! Core components:
//! - `Scheduler` — the orchestration API trait (feasibility, scheduling,
//!   shutdown, task queries)
//! - `local` — LocalScheduler, the in-process implementation
//! - `table` — two-level (instance → node) bookkeeping of task handles

pub mod local;
mod table;

pub use local::LocalScheduler;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::job::ScheduleJob;
use crate::task::Task;
use crate::worker::Worker;

/// The orchestration API: submit jobs, query live tasks, tear instances down.
///
/// A scheduler carries its own identity string, echoed into every task it
/// asks a worker to create, so a task can always report which scheduler owns
/// it.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Identity of this scheduler.
    fn id(&self) -> &str;

    /// Snapshot of all registered workers.
    async fn get_workers(&self) -> Vec<Arc<dyn Worker>>;

    /// Look up a single worker by identity.
    async fn get_worker(&self, worker_id: &str) -> Option<Arc<dyn Worker>>;

    /// Whether at least one registered worker declares support for the job's
    /// executor. Existence only — selection policy is not consulted.
    async fn can_schedule(&self, job: &ScheduleJob) -> bool;

    /// Create tasks for the job's `(instance, node)` slot, or reload the
    /// tasks already scheduled there. Returns the slot's task handles.
    async fn schedule(&self, job: ScheduleJob) -> Result<Vec<Arc<dyn Task>>>;

    /// Shut down every task belonging to the instance, then reset its nodes
    /// to first-scheduling state.
    async fn shutdown(&self, instance_id: &str) -> Result<()>;

    /// Every task scheduled for the given instance, flattened across nodes.
    /// Empty for unknown instances.
    async fn tasks_for_instance(&self, instance_id: &str) -> Vec<Arc<dyn Task>>;

    /// Every task across every instance.
    async fn all_tasks(&self) -> Vec<Arc<dyn Task>>;

    /// Total number of tracked task handles.
    async fn total_tasks(&self) -> usize;
}
