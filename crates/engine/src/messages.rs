//! Wire messages for the synthesis engine protocol.
//!
//! The engine speaks single-use connections: one JSON request object in,
//! one JSON reply object out. The reply stream carries no length prefix
//! or delimiter, so [`decode_response`] detects completion by the
//! accumulated bytes forming one fully decodable JSON object.

use serde::{Deserialize, Serialize};

/// Request sent to the engine, serialized as a single JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    /// Text to synthesize.
    pub text: String,
    /// Voice selector; the engine falls back to its default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Artifact filename, relative to the shared output directory.
    /// The engine accepts it under both keys, so both are populated.
    pub filename: String,
    pub output: String,
}

impl SynthesisRequest {
    /// Build a request producing `filename` in the shared output directory.
    pub fn new(text: impl Into<String>, voice: Option<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            text: text.into(),
            voice,
            output: filename.clone(),
            filename,
        }
    }
}

/// Reply from the engine.
///
/// `status == "ok"` signals success; any other value is a failure and
/// should carry a human-readable `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    /// Result metadata the engine may attach alongside `status`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EngineResponse {
    /// Whether the engine reported success.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Attempt to decode one complete reply from the bytes received so far.
///
/// Returns `Ok(None)` while the buffer is an incomplete prefix (EOF-class
/// parse error), `Ok(Some(..))` once it forms exactly one reply object,
/// and `Err` for a malformed or over-long payload. A strict prefix of a
/// JSON object is never itself a complete value, so a successful decode
/// cannot fire early on a truncated reply.
pub fn decode_response(buf: &[u8]) -> Result<Option<EngineResponse>, serde_json::Error> {
    match serde_json::from_slice::<EngineResponse>(buf) {
        Ok(response) => Ok(Some(response)),
        Err(e) if e.is_eof() => Ok(None),
        Err(e) => Err(e),
    }
}
