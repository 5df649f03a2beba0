//! One-shot Unix-socket client for the synthesis engine.
//!
//! [`EngineClient`] holds the connection configuration for the engine
//! socket. Each call to [`EngineClient::dispatch`] opens a fresh
//! connection, performs exactly one request/response exchange, and closes
//! the connection on every exit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::messages::{decode_response, EngineResponse, SynthesisRequest};

/// Default bound on a whole dispatch exchange.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the synthesis engine's Unix socket.
pub struct EngineClient {
    socket_path: PathBuf,
    timeout: Duration,
}

/// Errors from a dispatch exchange.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Failed to establish the socket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O failure while writing the request or reading the reply.
    #[error("I/O error: {0}")]
    Io(String),

    /// The reply stream violated the protocol (malformed JSON, or bytes
    /// past the end of the reply object).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The engine replied with a non-ok status.
    #[error("{0}")]
    Engine(String),

    /// The connection closed before a complete reply was received.
    #[error("Engine closed the connection before a complete reply")]
    ClosedEarly,

    /// The exchange did not finish within the configured timeout.
    #[error("Engine did not reply within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl EngineClient {
    /// Create a client targeting the engine socket at `socket_path`.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the exchange timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the engine socket this client connects to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Perform one request/response exchange with the engine.
    ///
    /// Opens a fresh connection, writes the serialized request once, then
    /// accumulates the unframed reply until it decodes as one complete
    /// JSON object (see [`decode_response`]). The whole exchange is
    /// bounded by the configured timeout. The connection closes when the
    /// stream drops, on success and on every error path alike.
    pub async fn dispatch(
        &self,
        request: &SynthesisRequest,
    ) -> Result<EngineResponse, EngineError> {
        match tokio::time::timeout(self.timeout, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, request: &SynthesisRequest) -> Result<EngineResponse, EngineError> {
        let mut stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            EngineError::Connection(format!(
                "Failed to connect to engine at {}: {e}",
                self.socket_path.display()
            ))
        })?;

        let payload = serde_json::to_vec(request)
            .map_err(|e| EngineError::Protocol(format!("Failed to serialize request: {e}")))?;
        stream
            .write_all(&payload)
            .await
            .map_err(|e| EngineError::Io(format!("Failed to write request: {e}")))?;

        let mut buf: Vec<u8> = Vec::with_capacity(256);
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream
                .read(&mut chunk)
                .await
                .map_err(|e| EngineError::Io(format!("Failed to read reply: {e}")))?;
            if n == 0 {
                return Err(EngineError::ClosedEarly);
            }
            buf.extend_from_slice(&chunk[..n]);

            match decode_response(&buf) {
                Ok(Some(response)) => {
                    if response.is_ok() {
                        tracing::debug!(
                            socket = %self.socket_path.display(),
                            reply_bytes = buf.len(),
                            "Engine reported success",
                        );
                        return Ok(response);
                    }
                    let EngineResponse { status, error, .. } = response;
                    let message = error
                        .unwrap_or_else(|| format!("Engine replied with status \"{status}\""));
                    return Err(EngineError::Engine(message));
                }
                // Incomplete reply, keep reading.
                Ok(None) => {}
                Err(e) => {
                    return Err(EngineError::Protocol(format!("Malformed engine reply: {e}")));
                }
            }
        }
    }
}
