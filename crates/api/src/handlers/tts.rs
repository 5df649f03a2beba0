//! Handlers for the `/tts` resource.
//!
//! Submission validates the input, creates a job record, and enqueues it
//! for the queue worker; it never waits on the engine. Status and audio
//! endpoints poll the job store.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use voxd_core::error::CoreError;
use voxd_core::job::{Job, JobStatus};
use voxd_core::types::JobId;
use voxd_engine::SynthesisRequest;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a job by ID, mapping an unknown ID to `NotFound`.
async fn find_job(state: &AppState, id: JobId) -> AppResult<Job> {
    state
        .jobs
        .get(id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Submission body for `POST /tts`.
#[derive(Debug, Deserialize)]
pub struct SubmitTtsRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

/// Payload returned on successful submission.
#[derive(Debug, Serialize)]
pub struct SubmittedJob {
    pub id: JobId,
}

/// POST /tts
///
/// Submit a synthesis request. Returns 202 with the new job's ID; the
/// job starts in `queued` status and is picked up by the queue worker.
/// Engine failures never surface here -- they are observed by polling
/// `GET /tts/{id}`.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitTtsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.text.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("Missing text".into())));
    }

    let id = uuid::Uuid::new_v4();
    let filename = format!("{id}.wav");
    let artifact_path = state.config.output_dir.join(&filename);

    state.jobs.create(id, artifact_path).await;
    state
        .queue
        .enqueue(id, SynthesisRequest::new(input.text, input.voice, filename))?;

    tracing::info!(job_id = %id, "Synthesis job submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SubmittedJob { id },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status payload for `GET /tts/{id}`.
#[derive(Debug, Serialize)]
pub struct JobStatusPayload {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /tts/{id}
///
/// Get a job's current status, including the failure message when the
/// job ended in `error`.
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state, id).await?;

    Ok(Json(DataResponse {
        data: JobStatusPayload {
            id: job.id,
            status: job.status,
            error: job.error,
        },
    }))
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// GET /tts/{id}/audio
///
/// Serve the produced artifact. Available only once the job is `done`;
/// earlier fetches yield 409. A `done` job whose file has already been
/// reclaimed yields 404.
pub async fn audio(State(state): State<AppState>, Path(id): Path<JobId>) -> AppResult<Response> {
    let job = find_job(&state, id).await?;

    if job.status != JobStatus::Done {
        return Err(AppError::Core(CoreError::NotReady(format!(
            "Audio for job {id} is not ready (status: {})",
            job.status
        ))));
    }

    let bytes = tokio::fs::read(&job.artifact_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::Core(CoreError::NotFound {
                entity: "Artifact",
                id,
            })
        } else {
            AppError::InternalError(format!(
                "Failed to read artifact {}: {e}",
                job.artifact_path.display()
            ))
        }
    })?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response())
}
