use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Unix socket the synthesis engine listens on.
    pub socket_path: PathBuf,
    /// Directory the engine writes audio artifacts into. Created at
    /// startup if absent.
    pub output_dir: PathBuf,
    /// Seconds a produced artifact is retained before the garbage
    /// collector deletes it.
    pub retention_secs: i64,
    /// Interval between garbage collector sweeps, in seconds.
    pub gc_interval_secs: u64,
    /// Bound on a single engine exchange, in seconds.
    pub engine_timeout_secs: u64,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default             |
    /// |------------------------|---------------------|
    /// | `HOST`                 | `0.0.0.0`           |
    /// | `PORT`                 | `3000`              |
    /// | `SOCKET_PATH`          | `/app/run/tts.sock` |
    /// | `OUTPUT_DIR`           | `/app/out`          |
    /// | `DELETE_SECONDS`       | `1000`              |
    /// | `GC_INTERVAL_SECS`     | `5`                 |
    /// | `ENGINE_TIMEOUT_SECS`  | `300`               |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let socket_path: PathBuf = std::env::var("SOCKET_PATH")
            .unwrap_or_else(|_| "/app/run/tts.sock".into())
            .into();

        let output_dir: PathBuf = std::env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| "/app/out".into())
            .into();

        let retention_secs: i64 = std::env::var("DELETE_SECONDS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("DELETE_SECONDS must be a valid i64");

        let gc_interval_secs: u64 = std::env::var("GC_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("GC_INTERVAL_SECS must be a valid u64");

        let engine_timeout_secs: u64 = std::env::var("ENGINE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("ENGINE_TIMEOUT_SECS must be a valid u64");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            socket_path,
            output_dir,
            retention_secs,
            gc_interval_secs,
            engine_timeout_secs,
            request_timeout_secs,
        }
    }

    /// Engine exchange timeout as a [`Duration`].
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }
}
