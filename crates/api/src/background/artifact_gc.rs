//! Periodic reclamation of expired audio artifacts.
//!
//! Spawns a background task that deletes artifacts older than the
//! configured retention threshold from the shared output directory.
//! Runs on a fixed interval using `tokio::time::interval`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use voxd_core::retention::RetentionSet;

/// Run the artifact reclamation loop.
///
/// Every `interval`, drains records older than `retention_secs` from the
/// retained set and deletes their files under `output_dir`. Runs until
/// `cancel` is triggered.
pub async fn run(
    retained: Arc<RetentionSet>,
    output_dir: PathBuf,
    retention_secs: i64,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_secs,
        interval_secs = interval.as_secs(),
        "Artifact reclamation job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Artifact reclamation job stopping");
                break;
            }
            _ = ticker.tick() => {
                sweep(&retained, &output_dir, retention_secs).await;
            }
        }
    }
}

/// One sweep: delete every artifact past its retention deadline.
///
/// An already-absent file counts as a successful deletion. Any other
/// failure is logged and the sweep continues; the record is retired
/// either way, so a failed deletion is not retried.
pub async fn sweep(retained: &RetentionSet, output_dir: &Path, retention_secs: i64) {
    let cutoff = Utc::now() - chrono::Duration::seconds(retention_secs);
    let expired = retained.drain_expired(cutoff).await;

    if expired.is_empty() {
        tracing::debug!("Artifact reclamation: nothing to purge");
        return;
    }

    for record in expired {
        let path = output_dir.join(&record.filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    job_id = %record.job_id,
                    file = %path.display(),
                    "Deleted expired artifact",
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    job_id = %record.job_id,
                    file = %path.display(),
                    "Expired artifact already absent",
                );
            }
            Err(e) => {
                tracing::error!(
                    job_id = %record.job_id,
                    file = %path.display(),
                    error = %e,
                    "Failed to delete expired artifact",
                );
            }
        }
    }
}
