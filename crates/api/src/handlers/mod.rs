//! Request handlers for the TTS gateway.
//!
//! Handlers validate input, delegate to the job store and queue handle in
//! [`AppState`](crate::state::AppState), and map errors via
//! [`AppError`](crate::error::AppError).

pub mod tts;
