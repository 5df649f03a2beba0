//! Retention bookkeeping for produced artifacts.
//!
//! After a job completes, its artifact stays on disk for a configured
//! window before the garbage collector reclaims it. A [`RetentionRecord`]
//! links the artifact to its creation time until then.

use tokio::sync::Mutex;

use crate::types::{JobId, Timestamp};

/// One completed job's artifact awaiting reclamation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionRecord {
    pub job_id: JobId,
    /// Artifact filename relative to the shared output directory.
    pub filename: String,
    pub created_at: Timestamp,
}

/// The set of retained artifacts.
///
/// The queue worker appends after each completed job; the garbage
/// collector drains expired records. Both serialize on the interior lock,
/// and [`drain_expired`](Self::drain_expired) swaps in the kept subset
/// atomically so a sweep never observes a half-updated set.
pub struct RetentionSet {
    records: Mutex<Vec<RetentionRecord>>,
}

impl RetentionSet {
    /// Create a new, empty set.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Record a completed job's artifact, stamped with the current time.
    pub async fn push(&self, job_id: JobId, filename: String) {
        let record = RetentionRecord {
            job_id,
            filename,
            created_at: chrono::Utc::now(),
        };
        self.records.lock().await.push(record);
    }

    /// Remove and return every record created at or before `cutoff`.
    ///
    /// Records newer than the cutoff stay for the next sweep. Each record
    /// is returned at most once.
    pub async fn drain_expired(&self, cutoff: Timestamp) -> Vec<RetentionRecord> {
        let mut guard = self.records.lock().await;
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *guard)
            .into_iter()
            .partition(|r| r.created_at <= cutoff);
        *guard = kept;
        expired
    }

    /// Number of records currently retained.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether no records are retained.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for RetentionSet {
    fn default() -> Self {
        Self::new()
    }
}
