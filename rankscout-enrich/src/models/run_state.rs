//! Enrichment run state
//!
//! `RunTracker` owns the single-run lock and the status snapshot served by
//! `GET /status`. At most one run holds a `RunPermit` at a time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// Outcome counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Rows in the input table
    pub rows_read: usize,
    /// Rows dropped for an empty identifier
    pub rows_skipped: usize,
    /// Rows persisted with enrichment fields
    pub rows_enriched: usize,
    /// Rows persisted with input fields only
    pub rows_unenriched: usize,
    /// Store writes, checkpoints and the final flush included
    pub flushes: usize,
}

impl RunSummary {
    pub fn rows_written(&self) -> usize {
        self.rows_enriched + self.rows_unenriched
    }
}

/// Run status snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running {
        run_id: Uuid,
        filename: String,
        processed: usize,
        total: usize,
        started_at: DateTime<Utc>,
    },
    Completed {
        run_id: Uuid,
        filename: String,
        summary: RunSummary,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    },
    Failed {
        run_id: Uuid,
        filename: String,
        message: String,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    },
}

/// Exclusive right to run one enrichment; released on drop
#[derive(Debug)]
pub struct RunPermit {
    run_id: Uuid,
    filename: String,
    started_at: DateTime<Utc>,
    _guard: OwnedMutexGuard<()>,
}

impl RunPermit {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

/// Run lock plus status
#[derive(Debug)]
pub struct RunTracker {
    run_lock: Arc<Mutex<()>>,
    status: RwLock<RunStatus>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            run_lock: Arc::new(Mutex::new(())),
            status: RwLock::new(RunStatus::Idle),
        }
    }

    /// Start a run, or `None` while another run holds the lock
    pub async fn try_begin(&self, filename: &str, total: usize) -> Option<RunPermit> {
        let guard = self.run_lock.clone().try_lock_owned().ok()?;

        let permit = RunPermit {
            run_id: Uuid::new_v4(),
            filename: filename.to_string(),
            started_at: Utc::now(),
            _guard: guard,
        };

        *self.status.write().await = RunStatus::Running {
            run_id: permit.run_id,
            filename: permit.filename.clone(),
            processed: 0,
            total,
            started_at: permit.started_at,
        };

        tracing::info!(run_id = %permit.run_id, filename = %filename, total, "Enrichment run started");
        Some(permit)
    }

    pub async fn snapshot(&self) -> RunStatus {
        self.status.read().await.clone()
    }

    /// Update the processed-row counter of the running run
    pub async fn record_progress(&self, rows_processed: usize) {
        if let RunStatus::Running { processed, .. } = &mut *self.status.write().await {
            *processed = rows_processed;
        }
    }

    pub async fn complete(&self, permit: RunPermit, summary: RunSummary) {
        tracing::info!(run_id = %permit.run_id, ?summary, "Enrichment run completed");

        *self.status.write().await = RunStatus::Completed {
            run_id: permit.run_id,
            filename: permit.filename,
            summary,
            started_at: permit.started_at,
            ended_at: Utc::now(),
        };
    }

    pub async fn fail(&self, permit: RunPermit, message: String) {
        tracing::error!(run_id = %permit.run_id, error = %message, "Enrichment run failed");

        *self.status.write().await = RunStatus::Failed {
            run_id: permit.run_id,
            filename: permit.filename,
            message,
            started_at: permit.started_at,
            ended_at: Utc::now(),
        };
    }

    /// Mark run `run_id` failed when its task ended without reporting
    ///
    /// No-op once the run has reported or another run has started.
    pub async fn abort(&self, run_id: Uuid, message: String) {
        let mut status = self.status.write().await;
        let RunStatus::Running {
            run_id: current,
            filename,
            started_at,
            ..
        } = &*status
        else {
            return;
        };
        if *current != run_id {
            return;
        }
        let (filename, started_at) = (filename.clone(), *started_at);

        tracing::error!(run_id = %run_id, error = %message, "Enrichment run aborted");

        *status = RunStatus::Failed {
            run_id,
            filename,
            message,
            started_at,
            ended_at: Utc::now(),
        };
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_idle() {
        let tracker = RunTracker::new();
        assert!(matches!(tracker.snapshot().await, RunStatus::Idle));
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_first_active() {
        let tracker = RunTracker::new();

        let permit = tracker.try_begin("a.csv", 3).await.unwrap();
        assert!(tracker.try_begin("b.csv", 5).await.is_none());

        tracker.complete(permit, RunSummary::default()).await;
        assert!(tracker.try_begin("b.csv", 5).await.is_some());
    }

    #[tokio::test]
    async fn test_progress_and_completion() {
        let tracker = RunTracker::new();
        let permit = tracker.try_begin("a.csv", 4).await.unwrap();
        let run_id = permit.run_id();

        tracker.record_progress(2).await;
        match tracker.snapshot().await {
            RunStatus::Running { processed, total, .. } => {
                assert_eq!(processed, 2);
                assert_eq!(total, 4);
            }
            other => panic!("Expected running, got {:?}", other),
        }

        let summary = RunSummary {
            rows_read: 4,
            rows_enriched: 4,
            flushes: 2,
            ..Default::default()
        };
        tracker.complete(permit, summary.clone()).await;

        match tracker.snapshot().await {
            RunStatus::Completed { run_id: id, summary: s, .. } => {
                assert_eq!(id, run_id);
                assert_eq!(s, summary);
            }
            other => panic!("Expected completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_releases_lock() {
        let tracker = RunTracker::new();
        let permit = tracker.try_begin("a.csv", 1).await.unwrap();

        tracker.fail(permit, "disk full".to_string()).await;

        let status = tracker.snapshot().await;
        assert!(matches!(status, RunStatus::Failed { ref message, .. } if message == "disk full"));
        assert!(tracker.try_begin("b.csv", 1).await.is_some());
    }

    #[tokio::test]
    async fn test_abort_marks_dead_run_failed() {
        let tracker = RunTracker::new();
        let permit = tracker.try_begin("a.csv", 2).await.unwrap();
        let run_id = permit.run_id();
        drop(permit);

        tracker.abort(Uuid::new_v4(), "other run".to_string()).await;
        assert!(matches!(tracker.snapshot().await, RunStatus::Running { .. }));

        tracker.abort(run_id, "task panicked".to_string()).await;
        match tracker.snapshot().await {
            RunStatus::Failed { run_id: id, filename, message, .. } => {
                assert_eq!(id, run_id);
                assert_eq!(filename, "a.csv");
                assert_eq!(message, "task panicked");
            }
            other => panic!("Expected failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_abort_after_completion_is_noop() {
        let tracker = RunTracker::new();
        let permit = tracker.try_begin("a.csv", 1).await.unwrap();
        let run_id = permit.run_id();
        tracker.complete(permit, RunSummary::default()).await;

        tracker.abort(run_id, "late".to_string()).await;
        assert!(matches!(tracker.snapshot().await, RunStatus::Completed { .. }));
    }

    #[test]
    fn test_status_serialization() {
        let value = serde_json::to_value(RunStatus::Idle).unwrap();
        assert_eq!(value, serde_json::json!({"state": "idle"}));
    }
}
