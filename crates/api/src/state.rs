use std::sync::Arc;

use voxd_core::job::JobStore;
use voxd_core::retention::RetentionSet;

use crate::config::ServerConfig;
use crate::queue::QueueHandle;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory job records (handlers read, the queue worker writes).
    pub jobs: Arc<JobStore>,
    /// Artifacts awaiting reclamation (worker appends, GC drains).
    pub retained: Arc<RetentionSet>,
    /// Enqueue handle feeding the queue worker.
    pub queue: QueueHandle,
}
