//! `HttpBackend` against a local axum server speaking `GET /api/episodes`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::common::{archive, short, test_config, Fault, AMIR_MATCHES};
use episode_search::request::{LIMIT_KEY, OFFSET_KEY};
use episode_search::testing::CorpusBackend;
use episode_search::{
    build, url_state, ErrorKind, HttpBackend, QueryParams, SearchBackend, SearchError,
    SearchQuery, SearchSession, SessionConfig, SessionStatus,
};

// ============================================================================
// SERVER
// ============================================================================

#[derive(Clone)]
struct Archive {
    corpus: Arc<CorpusBackend>,
    raw_queries: Arc<Mutex<Vec<String>>>,
}

async fn episodes(State(archive): State<Archive>, RawQuery(raw): RawQuery) -> Response {
    let raw = raw.unwrap_or_default();
    archive.raw_queries.lock().unwrap().push(raw.clone());

    let params = QueryParams::parse(&raw);
    let limit = params
        .get(LIMIT_KEY)
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);
    let offset = params.get(OFFSET_KEY).and_then(|v| v.parse().ok());
    let request = build(&url_state::decode(&raw), limit, offset);

    match archive.corpus.fetch(&request).await {
        Ok(page) => Json(page).into_response(),
        Err(SearchError::Backend { status }) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Err(_) => StatusCode::BAD_GATEWAY.into_response(),
    }
}

async fn garbage() -> &'static str {
    "<html>not json</html>"
}

/// Spawn the archive server; returns its base URL and the shared state.
async fn serve() -> (String, Archive) {
    let archive = Archive {
        corpus: Arc::new(CorpusBackend::new(archive())),
        raw_queries: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/episodes", get(episodes))
        .route("/broken/api/episodes", get(garbage))
        .with_state(archive.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), archive)
}

fn session_at(base_url: &str) -> SearchSession<HttpBackend> {
    let config = SessionConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
        ..test_config()
    };
    let backend = HttpBackend::new(&config.base_url);
    SearchSession::mount(config, backend, "")
}

// ============================================================================
// CONTRACT
// ============================================================================

#[tokio::test]
async fn sends_the_documented_query_string() {
    let (base_url, archive) = serve().await;
    let backend = HttpBackend::new(format!("{}/", base_url));

    let page = backend
        .fetch(&build(&SearchQuery::new("jake and amir"), 50, None))
        .await
        .unwrap();

    assert_eq!(page.total, 0);
    assert_eq!(
        archive.raw_queries.lock().unwrap().as_slice(),
        ["query=jake+and+amir&exactPhrase=false&searchTitle=false&limit=50"]
    );
}

#[tokio::test]
async fn full_session_over_http() {
    let (base_url, archive) = serve().await;
    let mut session = session_at(&base_url);

    assert_eq!(session.search(SearchQuery::new("amir")).await, SessionStatus::Loaded);
    session.load_more().await;
    session.load_more().await;

    assert_eq!(session.state().results().len(), AMIR_MATCHES);
    assert_eq!(session.state().total(), AMIR_MATCHES);
    assert_eq!(session.state().offset(), 20);

    let raw = archive.raw_queries.lock().unwrap().clone();
    assert_eq!(raw.len(), 3);
    assert!(raw[1].ends_with("&limit=10&offset=50"));
    assert!(raw[2].ends_with("&limit=10&offset=60"));
}

#[tokio::test]
async fn highlights_survive_the_wire() {
    let (base_url, _archive) = serve().await;
    let mut session = session_at(&base_url);

    session
        .search(SearchQuery::new("fired").with_search_title(true))
        .await;

    let entry = &session.state().results()[0];
    assert_eq!(entry.episode.title, "Fired");
    let highlight = entry.highlight.as_ref().unwrap();
    assert_eq!(highlight.get("title").unwrap(), &["<em>Fired</em>"]);
}

// ============================================================================
// FAILURES
// ============================================================================

#[tokio::test]
async fn non_success_status_is_a_backend_error() {
    let (base_url, archive) = serve().await;
    archive.corpus.fail_next(Fault::Status(503));

    let mut session = session_at(&base_url);
    let status = session.search(SearchQuery::new("jake")).await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Backend { status: 503 }));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (base_url, _archive) = serve().await;
    let backend = HttpBackend::new(format!("{}/broken", base_url));

    let err = backend
        .fetch(&build(&SearchQuery::new("jake"), 50, None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = session_at(&format!("http://{}", addr));
    let status = session.search(SearchQuery::new("jake")).await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Network));
}

#[tokio::test]
async fn slow_server_times_out() {
    let (base_url, archive) = serve().await;
    archive.corpus.fail_next(Fault::Hang);

    let config = SessionConfig {
        base_url,
        request_timeout_ms: 100,
        ..SessionConfig::default()
    };
    let backend = HttpBackend::new(&config.base_url);
    let mut session = SearchSession::mount(config, backend, "");

    let started = std::time::Instant::now();
    let status = session.search(SearchQuery::new("jake")).await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Timeout));
    assert!(started.elapsed() < short(5_000));
}
