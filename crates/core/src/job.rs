//! Job records and the in-memory job store.
//!
//! A [`Job`] tracks one synthesis request from submission to completion
//! or failure. Records live for the process lifetime; only the queue
//! worker mutates them, while API handlers poll concurrently.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::types::{JobId, Timestamp};

/// Lifecycle state of a job.
///
/// Transitions are monotone: `Queued -> Processing -> Done | Error`.
/// Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Error,
}

impl JobStatus {
    /// Whether the status is terminal (`Done` or `Error`).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One tracked synthesis request.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Absolute path of the artifact the engine writes for this job.
    #[serde(skip)]
    pub artifact_path: PathBuf,
    /// Failure message, set only when `status` is `Error`.
    pub error: Option<String>,
    pub created_at: Timestamp,
}

/// In-memory map from job ID to job record.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the HTTP handlers (readers) and the queue worker (the
/// single writer).
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new job with status `Queued` and return a copy of it.
    pub async fn create(&self, id: JobId, artifact_path: PathBuf) -> Job {
        let job = Job {
            id,
            status: JobStatus::Queued,
            artifact_path,
            error: None,
            created_at: chrono::Utc::now(),
        };
        self.jobs.write().await.insert(id, job.clone());
        job
    }

    /// Look up a job by ID.
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Update a job's status.
    ///
    /// Ignores unknown IDs and jobs already in a terminal state, so a
    /// terminal status can never be overwritten.
    pub async fn set_status(&self, id: JobId, status: JobStatus) {
        if let Some(job) = self.jobs.write().await.get_mut(&id) {
            if !job.status.is_terminal() {
                job.status = status;
            }
        }
    }

    /// Mark a job failed with the given message.
    ///
    /// Ignores unknown IDs and jobs already in a terminal state.
    pub async fn set_error(&self, id: JobId, message: impl Into<String>) {
        if let Some(job) = self.jobs.write().await.get_mut(&id) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Error;
                job.error = Some(message.into());
            }
        }
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
