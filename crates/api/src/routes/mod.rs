pub mod health;
pub mod tts;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health              health::router
/// /tts                 tts::router
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new().merge(health::router()).merge(tts::router())
}
