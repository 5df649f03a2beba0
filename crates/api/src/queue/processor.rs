//! Sequential dispatch worker for queued synthesis jobs.
//!
//! A single long-lived Tokio task consumes the submission backlog from an
//! mpsc channel in an explicit loop. The channel is the backlog and the
//! lone consumer awaits each dispatch to completion, so at most one
//! request is in flight to the engine and jobs run in strict submission
//! order.

use std::sync::Arc;

use tokio::sync::mpsc;
use voxd_core::error::CoreError;
use voxd_core::job::{JobStatus, JobStore};
use voxd_core::retention::RetentionSet;
use voxd_core::types::JobId;
use voxd_engine::{EngineClient, SynthesisRequest};

/// One pending submission awaiting dispatch.
#[derive(Debug)]
struct QueueEntry {
    job_id: JobId,
    request: SynthesisRequest,
}

/// Cloneable enqueue handle feeding the worker task.
#[derive(Clone)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<QueueEntry>,
}

impl QueueHandle {
    /// Append a submission to the tail of the backlog.
    ///
    /// Fails only when the worker task is gone, which means the process
    /// is shutting down.
    pub fn enqueue(&self, job_id: JobId, request: SynthesisRequest) -> Result<(), CoreError> {
        self.tx
            .send(QueueEntry { job_id, request })
            .map_err(|_| CoreError::Internal("Queue worker is not running".into()))
    }
}

/// The queue worker and its collaborators.
pub struct QueueProcessor {
    jobs: Arc<JobStore>,
    retained: Arc<RetentionSet>,
    engine: EngineClient,
}

impl QueueProcessor {
    /// Create a worker over the given stores and engine client.
    pub fn new(jobs: Arc<JobStore>, retained: Arc<RetentionSet>, engine: EngineClient) -> Self {
        Self {
            jobs,
            retained,
            engine,
        }
    }

    /// Spawn the worker task.
    ///
    /// Returns the enqueue handle and the task's join handle. The worker
    /// runs until every [`QueueHandle`] clone is dropped, draining
    /// whatever is still queued first.
    pub fn spawn(self) -> (QueueHandle, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(rx));
        (QueueHandle { tx }, handle)
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<QueueEntry>) {
        tracing::info!(
            socket = %self.engine.socket_path().display(),
            "Queue worker started",
        );

        while let Some(entry) = rx.recv().await {
            self.process(entry).await;
        }

        tracing::info!("Queue worker shutting down");
    }

    /// Dispatch one entry and record the outcome.
    ///
    /// Engine failures are terminal for the job and never retried; the
    /// worker moves on to the next entry either way.
    async fn process(&self, entry: QueueEntry) {
        let QueueEntry { job_id, request } = entry;

        self.jobs.set_status(job_id, JobStatus::Processing).await;
        tracing::info!(%job_id, "Dispatching job to engine");

        match self.engine.dispatch(&request).await {
            Ok(_response) => {
                self.jobs.set_status(job_id, JobStatus::Done).await;
                self.retained.push(job_id, request.filename).await;
                tracing::info!(%job_id, "Job completed");
            }
            Err(e) => {
                tracing::error!(%job_id, error = %e, "Engine dispatch failed");
                self.jobs.set_error(job_id, e.to_string()).await;
            }
        }
    }
}
