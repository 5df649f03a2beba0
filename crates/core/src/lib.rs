//! Domain state for the voxd text-to-speech gateway.
//!
//! Pure in-memory state and domain error types. No I/O, no HTTP types --
//! the engine protocol lives in `voxd-engine` and the HTTP surface in
//! `voxd-api`.

pub mod error;
pub mod job;
pub mod retention;
pub mod types;
