//! Route definitions for the `/tts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tts;
use crate::state::AppState;

/// Routes mounted at root level.
///
/// ```text
/// POST   /tts             -> submit
/// GET    /tts/{id}        -> status
/// GET    /tts/{id}/audio  -> audio
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tts", post(tts::submit))
        .route("/tts/{id}", get(tts::status))
        .route("/tts/{id}/audio", get(tts::audio))
}
