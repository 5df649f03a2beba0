use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxd_api::config::ServerConfig;
use voxd_api::queue::QueueProcessor;
use voxd_api::state::AppState;
use voxd_api::{background, routes};
use voxd_core::job::JobStore;
use voxd_core::retention::RetentionSet;
use voxd_engine::EngineClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxd_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        socket = %config.socket_path.display(),
        retention_secs = config.retention_secs,
        "Loaded server configuration",
    );

    // --- Output directory ---
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .expect("Failed to create output directory");
    tracing::info!(dir = %config.output_dir.display(), "Output directory ready");

    // --- Shared state ---
    let jobs = Arc::new(JobStore::new());
    let retained = Arc::new(RetentionSet::new());

    // --- Queue worker ---
    let engine =
        EngineClient::new(config.socket_path.clone()).with_timeout(config.engine_timeout());
    let (queue, worker_handle) =
        QueueProcessor::new(Arc::clone(&jobs), Arc::clone(&retained), engine).spawn();
    tracing::info!("Queue worker started");

    // --- Garbage collector ---
    let gc_cancel = tokio_util::sync::CancellationToken::new();
    let gc_handle = tokio::spawn(background::artifact_gc::run(
        Arc::clone(&retained),
        config.output_dir.clone(),
        config.retention_secs,
        Duration::from_secs(config.gc_interval_secs),
        gc_cancel.clone(),
    ));
    tracing::info!("Artifact reclamation started");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        jobs,
        retained,
        queue,
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        .merge(routes::app_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // Shared state.
        .with_state(state.clone());

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Drop the last enqueue handle so the worker drains the backlog and exits.
    drop(state);
    let _ = tokio::time::timeout(Duration::from_secs(30), worker_handle).await;
    tracing::info!("Queue worker stopped");

    gc_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), gc_handle).await;
    tracing::info!("Artifact reclamation stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
