use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use voxd_api::config::ServerConfig;
use voxd_api::queue::QueueProcessor;
use voxd_api::routes;
use voxd_api::state::AppState;
use voxd_core::job::JobStore;
use voxd_core::retention::RetentionSet;
use voxd_engine::EngineClient;

/// Build a test `ServerConfig` rooted in a temp directory.
///
/// The engine socket and output directory live under `dir`, so each test
/// gets an isolated filesystem footprint.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        socket_path: dir.join("tts.sock"),
        output_dir: dir.join("out"),
        retention_secs: 1000,
        gc_interval_secs: 5,
        engine_timeout_secs: 5,
        request_timeout_secs: 30,
    }
}

/// A fully wired application plus the state backing it.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// Build the full application router with all middleware layers and a
/// live queue worker, rooted at `dir`.
///
/// This mirrors the construction in `main.rs` so integration tests
/// exercise the same middleware stack (request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(dir: &Path) -> TestApp {
    let config = test_config(dir);
    std::fs::create_dir_all(&config.output_dir).unwrap();

    let jobs = Arc::new(JobStore::new());
    let retained = Arc::new(RetentionSet::new());
    let engine =
        EngineClient::new(config.socket_path.clone()).with_timeout(config.engine_timeout());
    let (queue, _worker) =
        QueueProcessor::new(Arc::clone(&jobs), Arc::clone(&retained), engine).spawn();

    let state = AppState {
        config: Arc::new(config),
        jobs,
        retained,
        queue,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::app_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state.clone());

    TestApp { app, state }
}

/// Issue a GET request against a clone of the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Issue a POST request with a JSON body against a clone of the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a synthesis request and return the new job's ID.
pub async fn submit(app: &Router, body: serde_json::Value) -> String {
    let response = post_json(app.clone(), "/tts", body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Poll a job's status until it reaches `want` or a deadline passes.
///
/// Returns the final `data` payload so callers can assert on the error
/// message as well.
pub async fn wait_for_status(app: &Router, id: &str, want: &str) -> serde_json::Value {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let response = get(app.clone(), &format!("/tts/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["data"]["status"] == want {
            return json["data"].clone();
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for job {id} to reach {want}; last seen: {json}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Requests received by a stub engine, in arrival order.
pub type StubLog = Arc<Mutex<Vec<serde_json::Value>>>;

/// Spawn a stub engine on `socket_path`, serving connections one at a
/// time the way the real engine does.
///
/// Each parsed request is appended to the returned log, then `respond`
/// produces the reply bytes written back on the same connection.
pub fn spawn_stub_engine<F>(socket_path: &Path, mut respond: F) -> StubLog
where
    F: FnMut(&serde_json::Value) -> Vec<u8> + Send + 'static,
{
    let log: StubLog = Arc::default();
    let seen = Arc::clone(&log);
    let listener = UnixListener::bind(socket_path).unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _addr)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 8192];
            let Ok(n) = stream.read(&mut buf).await else {
                continue;
            };
            let Ok(request) = serde_json::from_slice::<serde_json::Value>(&buf[..n]) else {
                continue;
            };
            seen.lock().unwrap().push(request.clone());
            let reply = respond(&request);
            let _ = stream.write_all(&reply).await;
        }
    });

    log
}
