//! Worker registry — identity-keyed map of known execution hosts.

use std::sync::Arc;

use dashmap::DashMap;

use crate::worker::Worker;

/// Registry of known workers.
///
/// Backed by a sharded concurrent map so registration is atomic per key and
/// safe to interleave with lookups from in-flight scheduling calls. The
/// registry never owns a worker's execution machinery, only the reference.
pub struct WorkerRegistry {
    workers: DashMap<String, Arc<dyn Worker>>,
}

impl WorkerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            workers: DashMap::new(),
        }
    }

    /// Register a worker under its identity, replacing any previous entry
    /// with the same identity.
    pub fn add_worker(&self, worker: Arc<dyn Worker>) {
        let id = worker.id().to_string();
        tracing::debug!(worker = %id, name = %worker.name(), "Registered worker");
        self.workers.insert(id, worker);
    }

    /// Get a worker by identity.
    pub fn get_worker(&self, worker_id: &str) -> Option<Arc<dyn Worker>> {
        self.workers.get(worker_id).map(|w| Arc::clone(&w))
    }

    /// Snapshot of all registered workers. No ordering guarantee.
    pub fn get_workers(&self) -> Vec<Arc<dyn Worker>> {
        self.workers.iter().map(|w| Arc::clone(&w)).collect()
    }

    /// Check if a worker identity is registered.
    pub fn contains(&self, worker_id: &str) -> bool {
        self.workers.contains_key(worker_id)
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the registry has no workers.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use crate::job::ScheduleJob;
    use crate::task::Task;
    use async_trait::async_trait;

    struct MockWorker {
        id: String,
        executors: Vec<String>,
    }

    #[async_trait]
    impl Worker for MockWorker {
        fn id(&self) -> &str {
            &self.id
        }
        async fn supported_executors(&self) -> Result<Vec<String>, WorkerError> {
            Ok(self.executors.clone())
        }
        async fn create_task(
            &self,
            _scheduler_id: &str,
            _job: &ScheduleJob,
        ) -> Result<Arc<dyn Task>, WorkerError> {
            unimplemented!("not used in registry tests")
        }
    }

    fn worker(id: &str) -> Arc<dyn Worker> {
        Arc::new(MockWorker {
            id: id.to_string(),
            executors: vec!["http".to_string()],
        })
    }

    #[tokio::test]
    async fn add_and_get() {
        let registry = WorkerRegistry::new();
        registry.add_worker(worker("w1"));

        assert!(registry.contains("w1"));
        assert!(!registry.contains("w2"));

        let fetched = registry.get_worker("w1");
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().id(), "w1");
        assert!(registry.get_worker("missing").is_none());
    }

    #[tokio::test]
    async fn add_replaces_same_identity() {
        let registry = WorkerRegistry::new();
        registry.add_worker(Arc::new(MockWorker {
            id: "w1".to_string(),
            executors: vec!["http".to_string()],
        }));
        registry.add_worker(Arc::new(MockWorker {
            id: "w1".to_string(),
            executors: vec!["mqtt".to_string()],
        }));

        assert_eq!(registry.len(), 1);
        let fetched = registry.get_worker("w1").unwrap();
        let executors = fetched.supported_executors().await.unwrap();
        assert_eq!(executors, vec!["mqtt".to_string()]);
    }

    #[tokio::test]
    async fn snapshot_lists_all() {
        let registry = WorkerRegistry::new();
        registry.add_worker(worker("a"));
        registry.add_worker(worker("b"));

        let snapshot = registry.get_workers();
        assert_eq!(snapshot.len(), 2);
        let mut ids: Vec<&str> = snapshot.iter().map(|w| w.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn concurrent_registration() {
        let registry = Arc::new(WorkerRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry.add_worker(worker(&format!("w{i}")));
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len(), 16);
    }
}
