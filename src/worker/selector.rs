//! Worker selection policies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::job::ScheduleJob;
use crate::worker::Worker;

/// Strategy for choosing which eligible workers host a job's tasks.
///
/// `candidates` only contains workers that already declared support for the
/// job's executor; the selector ranks or narrows them, it never widens the
/// set or mutates the registry. Returning an empty list means nothing gets
/// scheduled for this call.
#[async_trait]
pub trait WorkerSelector: Send + Sync {
    /// Choose the worker(s) that should host the job.
    async fn select(
        &self,
        candidates: Vec<Arc<dyn Worker>>,
        job: &ScheduleJob,
    ) -> Vec<Arc<dyn Worker>>;
}

/// Default policy: host the job on the first eligible worker.
///
/// Deterministic for a stable candidate order, arbitrary otherwise — which
/// matches what single-task-per-node callers expect.
pub struct TakeFirstSelector;

#[async_trait]
impl WorkerSelector for TakeFirstSelector {
    async fn select(
        &self,
        mut candidates: Vec<Arc<dyn Worker>>,
        _job: &ScheduleJob,
    ) -> Vec<Arc<dyn Worker>> {
        candidates.truncate(1);
        candidates
    }
}

/// Rotating policy: spread successive creation passes across equivalent
/// candidates.
///
/// Still picks exactly one worker per call. Candidates are ordered by worker
/// identity before the cursor applies, so rotation stays stable even though
/// the registry enumerates in arbitrary order. The cursor advances globally,
/// not per executor type.
pub struct RoundRobinSelector {
    cursor: AtomicUsize,
}

impl RoundRobinSelector {
    /// Create a selector with its cursor at the first candidate.
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobinSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerSelector for RoundRobinSelector {
    async fn select(
        &self,
        mut candidates: Vec<Arc<dyn Worker>>,
        _job: &ScheduleJob,
    ) -> Vec<Arc<dyn Worker>> {
        if candidates.is_empty() {
            return candidates;
        }
        candidates.sort_by(|a, b| a.id().cmp(b.id()));
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % candidates.len();
        vec![Arc::clone(&candidates[index])]
    }
}
