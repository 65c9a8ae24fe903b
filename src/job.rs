//! Job descriptor — what should run, and where it belongs.

use serde::{Deserialize, Serialize};

/// Specification of a schedulable unit of work.
///
/// A job names the rule instance it belongs to, the node within that
/// instance's graph, and the executor type required to run the node. The
/// scheduler treats the descriptor as immutable; rescheduling replaces it
/// wholesale via [`Task::set_job`](crate::task::Task::set_job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleJob {
    /// Owning rule instance.
    pub instance_id: String,
    /// Node within the instance's rule graph.
    pub node_id: String,
    /// Executor type a worker must support to host this job.
    pub executor: String,
    /// Arbitrary node configuration, passed through to the worker untouched.
    #[serde(default)]
    pub configuration: serde_json::Value,
}

impl ScheduleJob {
    /// Create a descriptor with no node configuration.
    pub fn new(
        instance_id: impl Into<String>,
        node_id: impl Into<String>,
        executor: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            node_id: node_id.into(),
            executor: executor.into(),
            configuration: serde_json::Value::Null,
        }
    }

    /// Attach node configuration.
    pub fn with_configuration(mut self, configuration: serde_json::Value) -> Self {
        self.configuration = configuration;
        self
    }
}
