//! Local scheduler: the in-process implementation of the scheduling API.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, ScheduleError};
use crate::job::ScheduleJob;
use crate::scheduler::Scheduler;
use crate::scheduler::table::{NodeSlot, TaskTable};
use crate::task::Task;
use crate::worker::{TakeFirstSelector, Worker, WorkerRegistry, WorkerSelector};

/// Schedules jobs onto in-process workers and tracks the resulting tasks.
///
/// The first `schedule` call for an `(instance, node)` pair materializes
/// tasks through the selection policy; every later call pushes the fresh
/// descriptor into the existing tasks and reloads them instead of creating
/// new ones. `shutdown` tears an instance's tasks down and resets its nodes
/// to first-scheduling state.
pub struct LocalScheduler {
    id: String,
    registry: WorkerRegistry,
    table: TaskTable,
    selector: Arc<dyn WorkerSelector>,
}

impl LocalScheduler {
    /// Create a scheduler with the given identity and the default take-first
    /// selection policy.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            registry: WorkerRegistry::new(),
            table: TaskTable::new(),
            selector: Arc::new(TakeFirstSelector),
        }
    }

    /// Replace the selection policy.
    pub fn with_selector(mut self, selector: Arc<dyn WorkerSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Register a worker, replacing any previous one with the same identity.
    /// Existing tasks keep running on the worker that created them.
    pub fn add_worker(&self, worker: Arc<dyn Worker>) {
        self.registry.add_worker(worker);
    }

    /// The underlying worker registry.
    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Workers declaring support for `executor`.
    ///
    /// A failed capability query downgrades that worker to "does not
    /// support": it is skipped, the lookup itself never fails.
    async fn find_supporting(&self, executor: &str) -> Vec<Arc<dyn Worker>> {
        let workers = self.registry.get_workers();
        let queries = join_all(workers.iter().map(|w| w.supported_executors())).await;

        workers
            .into_iter()
            .zip(queries)
            .filter_map(|(worker, support)| match support {
                Ok(executors) if executors.iter().any(|e| e == executor) => Some(worker),
                Ok(_) => None,
                Err(e) => {
                    warn!(
                        worker = %worker.id(),
                        error = %e,
                        "Capability query failed, skipping worker"
                    );
                    None
                }
            })
            .collect()
    }

    /// Creation pass for an empty node slot. The caller holds the slot's
    /// creation lock.
    async fn create_tasks(
        &self,
        slot: &NodeSlot,
        job: &ScheduleJob,
    ) -> Result<Vec<Arc<dyn Task>>> {
        let candidates = self.find_supporting(&job.executor).await;
        if candidates.is_empty() {
            return Err(ScheduleError::UnsupportedExecutor {
                executor: job.executor.clone(),
            }
            .into());
        }

        let selected = self.selector.select(candidates, job).await;
        if selected.is_empty() {
            warn!(
                instance = %job.instance_id,
                node = %job.node_id,
                executor = %job.executor,
                "Selector picked no workers, nothing scheduled"
            );
            return Ok(Vec::new());
        }

        let mut created: Vec<Arc<dyn Task>> = Vec::with_capacity(selected.len());
        for worker in selected {
            // Each task is registered as soon as it exists. On a later
            // failure the earlier tasks stay registered, to be torn down via
            // `shutdown` or refreshed by a retry.
            let task = worker.create_task(&self.id, job).await?;
            debug!(
                task = %task.id(),
                worker = %worker.id(),
                instance = %job.instance_id,
                node = %job.node_id,
                "Created task"
            );
            slot.push(Arc::clone(&task)).await;
            created.push(task);
        }
        Ok(created)
    }

    /// Reload pass over a node's existing tasks: push the fresh descriptor
    /// into each, then reload them. Every task is attempted before the first
    /// failure is surfaced.
    async fn reload_tasks(
        &self,
        tasks: Vec<Arc<dyn Task>>,
        job: &ScheduleJob,
    ) -> Result<Vec<Arc<dyn Task>>> {
        let results = join_all(tasks.iter().map(|task| {
            let job = job.clone();
            async move {
                let held = task.job();
                if held.executor != job.executor {
                    warn!(
                        task = %task.id(),
                        held = %held.executor,
                        requested = %job.executor,
                        "Executor changed on reschedule, reloading the existing task in place"
                    );
                }
                task.set_job(job).await?;
                task.reload().await?;
                debug!(task = %task.id(), "Reloaded task");
                Ok::<_, Error>(())
            }
        }))
        .await;

        for result in results {
            result?;
        }
        Ok(tasks)
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new("local")
    }
}

#[async_trait]
impl Scheduler for LocalScheduler {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_workers(&self) -> Vec<Arc<dyn Worker>> {
        self.registry.get_workers()
    }

    async fn get_worker(&self, worker_id: &str) -> Option<Arc<dyn Worker>> {
        self.registry.get_worker(worker_id)
    }

    async fn can_schedule(&self, job: &ScheduleJob) -> bool {
        !self.find_supporting(&job.executor).await.is_empty()
    }

    async fn schedule(&self, job: ScheduleJob) -> Result<Vec<Arc<dyn Task>>> {
        let slot = self.table.node_slot(&job.instance_id, &job.node_id);

        // Fast path: the node already has tasks, refresh them in place.
        let existing = slot.tasks().await;
        if !existing.is_empty() {
            return self.reload_tasks(existing, &job).await;
        }

        // First scheduling for this node. The creation lock serializes
        // racing calls; a loser finds the slot populated on re-check and
        // falls through to the reload path.
        let guard = slot.lock_creation().await;
        let existing = slot.tasks().await;
        if !existing.is_empty() {
            drop(guard);
            return self.reload_tasks(existing, &job).await;
        }
        let created = self.create_tasks(&slot, &job).await;
        drop(guard);
        created
    }

    async fn shutdown(&self, instance_id: &str) -> Result<()> {
        let tasks = self.table.tasks_for_instance(instance_id).await;

        let results = join_all(tasks.iter().map(|task| task.shutdown())).await;

        let mut first_failure = None;
        for (task, result) in tasks.iter().zip(results) {
            if let Err(e) = result {
                warn!(task = %task.id(), error = %e, "Task shutdown failed");
                first_failure.get_or_insert(e);
            }
        }

        // Bookkeeping is reset even when individual shutdowns failed, so the
        // instance can always be scheduled fresh afterwards.
        self.table.clear_instance(instance_id);
        info!(
            instance = %instance_id,
            tasks = tasks.len(),
            "Instance shut down"
        );

        match first_failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    async fn tasks_for_instance(&self, instance_id: &str) -> Vec<Arc<dyn Task>> {
        self.table.tasks_for_instance(instance_id).await
    }

    async fn all_tasks(&self) -> Vec<Arc<dyn Task>> {
        self.table.all_tasks().await
    }

    async fn total_tasks(&self) -> usize {
        self.table.total_tasks().await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
