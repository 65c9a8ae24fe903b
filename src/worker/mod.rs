//! Worker system — execution hosts and the policies that pick between them.
//!
//! Core components:
//! - `Worker` — trait implemented by execution hosts (capability declaration
//!   + task materialization)
//! - `registry` — WorkerRegistry, the identity-keyed worker map
//! - `selector` — WorkerSelector strategy trait with the stock policies

pub mod registry;
pub mod selector;

pub use registry::WorkerRegistry;
pub use selector::{RoundRobinSelector, TakeFirstSelector, WorkerSelector};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::job::ScheduleJob;
use crate::task::Task;

/// An execution host declaring which executor types it can run.
///
/// Workers live outside this crate; the scheduler only ever holds
/// `Arc<dyn Worker>` references handed in through registration. Everything a
/// worker actually does with a task — process management, sandboxing,
/// remote dispatch — is its own business.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Stable identity of the worker. Registration keys on this.
    fn id(&self) -> &str;

    /// Human-readable label for log lines. Defaults to the identity.
    fn name(&self) -> &str {
        self.id()
    }

    /// Executor types this worker can host.
    ///
    /// Queried on every feasibility check and creation pass; an empty list or
    /// an error both count as "supports nothing".
    async fn supported_executors(&self) -> Result<Vec<String>, WorkerError>;

    /// Materialize a task for `job`, bound to the identity of the scheduler
    /// asking for it.
    async fn create_task(
        &self,
        scheduler_id: &str,
        job: &ScheduleJob,
    ) -> Result<Arc<dyn Task>, WorkerError>;
}
