//! Two-level task table: instance → node → ordered task handles.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::task::Task;

/// Per-node slot: the ordered task handles plus the lock that serializes
/// first-creation passes.
pub(crate) struct NodeSlot {
    /// Held for the whole creation sequence so racing first `schedule` calls
    /// collapse into a single creation pass. Queries and reloads never take
    /// it.
    create_lock: Mutex<()>,
    tasks: RwLock<Vec<Arc<dyn Task>>>,
}

impl NodeSlot {
    fn new() -> Self {
        Self {
            create_lock: Mutex::new(()),
            tasks: RwLock::new(Vec::new()),
        }
    }

    pub(crate) async fn lock_creation(&self) -> MutexGuard<'_, ()> {
        self.create_lock.lock().await
    }

    /// Snapshot of the slot's task handles, in append order.
    pub(crate) async fn tasks(&self) -> Vec<Arc<dyn Task>> {
        self.tasks.read().await.clone()
    }

    /// Append a freshly created task. Visible to readers immediately, before
    /// the rest of the creation pass finishes.
    pub(crate) async fn push(&self, task: Arc<dyn Task>) {
        self.tasks.write().await.push(task);
    }
}

/// Sharded two-level map of live tasks. Per-key operations are atomic; no
/// operation takes a whole-table lock.
pub(crate) struct TaskTable {
    instances: DashMap<String, Arc<DashMap<String, Arc<NodeSlot>>>>,
}

impl TaskTable {
    pub(crate) fn new() -> Self {
        Self {
            instances: DashMap::new(),
        }
    }

    /// Get or create the slot for `(instance_id, node_id)`.
    pub(crate) fn node_slot(&self, instance_id: &str, node_id: &str) -> Arc<NodeSlot> {
        let nodes = self
            .instances
            .entry(instance_id.to_string())
            .or_insert_with(|| Arc::new(DashMap::new()))
            .clone();
        let slot = nodes
            .entry(node_id.to_string())
            .or_insert_with(|| Arc::new(NodeSlot::new()))
            .clone();
        slot
    }

    /// Slots currently present for an instance. Never creates entries.
    fn instance_slots(&self, instance_id: &str) -> Vec<Arc<NodeSlot>> {
        match self.instances.get(instance_id) {
            Some(nodes) => nodes.iter().map(|slot| Arc::clone(&slot)).collect(),
            None => Vec::new(),
        }
    }

    /// Every task scheduled for the instance, flattened across its nodes.
    pub(crate) async fn tasks_for_instance(&self, instance_id: &str) -> Vec<Arc<dyn Task>> {
        let mut tasks = Vec::new();
        for slot in self.instance_slots(instance_id) {
            tasks.extend(slot.tasks().await);
        }
        tasks
    }

    /// Every task in the table.
    pub(crate) async fn all_tasks(&self) -> Vec<Arc<dyn Task>> {
        let slots: Vec<Arc<NodeSlot>> = self
            .instances
            .iter()
            .flat_map(|nodes| {
                nodes
                    .iter()
                    .map(|slot| Arc::clone(&slot))
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut tasks = Vec::new();
        for slot in slots {
            tasks.extend(slot.tasks().await);
        }
        tasks
    }

    pub(crate) async fn total_tasks(&self) -> usize {
        self.all_tasks().await.len()
    }

    /// Empty the instance's node map in place. The per-instance entry itself
    /// stays, so the next `node_slot` call starts from fresh, empty slots.
    pub(crate) fn clear_instance(&self, instance_id: &str) {
        if let Some(nodes) = self.instances.get(instance_id) {
            nodes.clear();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::job::ScheduleJob;
    use crate::task::TaskState;
    use async_trait::async_trait;

    struct NullTask {
        id: String,
    }

    #[async_trait]
    impl Task for NullTask {
        fn id(&self) -> &str {
            &self.id
        }

        fn worker_id(&self) -> &str {
            "null-worker"
        }

        fn scheduler_id(&self) -> &str {
            "null-scheduler"
        }

        fn job(&self) -> ScheduleJob {
            ScheduleJob::new("i", "n", "x")
        }

        fn state(&self) -> TaskState {
            TaskState::Running
        }

        async fn set_job(&self, _job: ScheduleJob) -> Result<(), TaskError> {
            Ok(())
        }

        async fn reload(&self) -> Result<(), TaskError> {
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), TaskError> {
            Ok(())
        }
    }

    fn task(id: &str) -> Arc<dyn Task> {
        Arc::new(NullTask { id: id.to_string() })
    }

    #[tokio::test]
    async fn node_slot_is_stable_across_lookups() {
        let table = TaskTable::new();

        let first = table.node_slot("i1", "n1");
        let second = table.node_slot("i1", "n1");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.tasks().await.is_empty());
    }

    #[tokio::test]
    async fn pushed_tasks_are_visible_in_append_order() {
        let table = TaskTable::new();
        let slot = table.node_slot("i1", "n1");

        slot.push(task("t1")).await;
        assert_eq!(slot.tasks().await.len(), 1);

        slot.push(task("t2")).await;
        let tasks = slot.tasks().await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id(), "t1");
        assert_eq!(tasks[1].id(), "t2");
    }

    #[tokio::test]
    async fn queries_on_unknown_instance_are_empty() {
        let table = TaskTable::new();

        assert!(table.tasks_for_instance("missing").await.is_empty());
        assert!(table.all_tasks().await.is_empty());
        assert_eq!(table.total_tasks().await, 0);

        // Read-only queries must not have created the entry.
        table.clear_instance("missing");
        assert_eq!(table.total_tasks().await, 0);
    }

    #[tokio::test]
    async fn totals_span_instances_and_nodes() {
        let table = TaskTable::new();

        table.node_slot("i1", "n1").push(task("t1")).await;
        table.node_slot("i1", "n2").push(task("t2")).await;
        table.node_slot("i2", "n1").push(task("t3")).await;

        assert_eq!(table.tasks_for_instance("i1").await.len(), 2);
        assert_eq!(table.tasks_for_instance("i2").await.len(), 1);
        assert_eq!(table.all_tasks().await.len(), 3);
        assert_eq!(table.total_tasks().await, 3);
    }

    #[tokio::test]
    async fn clear_instance_empties_its_nodes_only() {
        let table = TaskTable::new();

        let slot = table.node_slot("i1", "n1");
        slot.push(task("t1")).await;
        table.node_slot("i2", "n1").push(task("t2")).await;

        table.clear_instance("i1");

        assert!(table.tasks_for_instance("i1").await.is_empty());
        assert_eq!(table.tasks_for_instance("i2").await.len(), 1);

        // The cleared instance starts over with a fresh slot.
        let fresh = table.node_slot("i1", "n1");
        assert!(!Arc::ptr_eq(&slot, &fresh));
        assert!(fresh.tasks().await.is_empty());
    }
}
