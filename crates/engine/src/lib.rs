//! Client library for the external speech-synthesis engine.
//!
//! Provides the typed wire messages, the response framing used on the
//! engine's unframed reply stream, and a one-shot Unix-socket client
//! performing a single request/response exchange per connection.

pub mod client;
pub mod messages;

pub use client::{EngineClient, EngineError};
pub use messages::{EngineResponse, SynthesisRequest};
