use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jiff::{SignedDuration, Timestamp};
use serde_json::{json, Value};
use tinylink_core::repository::Result as StorageResult;
use tinylink_core::{ManualClock, Repository, ShortCode, ShortLink, StorageError};
use tinylink_gateway::{App, AppState};
use tinylink_generator::{Generator, RandomGenerator};
use tinylink_shortener::ShortenerService;
use tinylink_storage::InMemoryRepository;
use tower::ServiceExt; // for oneshot

/// Always proposes the same code, so responses are predictable.
struct FixedGenerator(&'static str);

impl Generator for FixedGenerator {
    type Output = ShortCode;

    fn generate(&self, _target_url: &str, _attempt: u32) -> ShortCode {
        ShortCode::new(self.0).unwrap()
    }
}

/// Fails every call with a backend-specific message.
struct BrokenRepository;

#[async_trait]
impl Repository for BrokenRepository {
    async fn insert(&self, _link: ShortLink) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk I/O error at /var/lib/secret.db".into()))
    }

    async fn get(&self, _code: &ShortCode) -> StorageResult<ShortLink> {
        Err(StorageError::Unavailable("disk I/O error at /var/lib/secret.db".into()))
    }

    async fn exists(&self, _code: &ShortCode) -> StorageResult<bool> {
        Err(StorageError::Unavailable("disk I/O error at /var/lib/secret.db".into()))
    }

    async fn purge_expired(&self, _now: Timestamp) -> StorageResult<u64> {
        Err(StorageError::Unavailable("disk I/O error at /var/lib/secret.db".into()))
    }
}

fn start() -> Timestamp {
    Timestamp::from_second(1_700_000_000).unwrap()
}

fn fixed_app(code: &'static str) -> Router {
    let service = ShortenerService::new(InMemoryRepository::new(), FixedGenerator(code));
    App::router(AppState::new(Arc::new(service)))
}

fn clocked_app(clock: ManualClock) -> Router {
    let service =
        ShortenerService::new(InMemoryRepository::new(), RandomGenerator::default())
            .with_clock(clock);
    App::router(AppState::new(Arc::new(service)))
}

fn random_app() -> Router {
    let service = ShortenerService::new(InMemoryRepository::new(), RandomGenerator::default());
    App::router(AppState::new(Arc::new(service)))
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "non-json body: status={} body={}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    Reply {
        status,
        headers,
        body,
    }
}

fn shorten_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/shorten")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn shorten(app: &Router, url: &str, minutes: i64) -> String {
    let reply = send(
        app,
        shorten_request(json!({ "url": url, "expiration_in_minutes": minutes })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "body={}", reply.body);
    reply.body["shortlink"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn shorten_redirect_and_info_round_trip() {
    let app = fixed_app("abc123X");

    let reply = send(
        &app,
        shorten_request(json!({ "url": "https://example.com", "expiration_in_minutes": 0 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body, json!({ "shortlink": "abc123X" }));

    let reply = send(&app, get("/abc123X")).await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.headers[header::LOCATION], "https://example.com");

    let reply = send(&app, get("/api/info?shortlink=abc123X")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["shortlink"], "abc123X");
    assert_eq!(reply.body["url"], "https://example.com");
    assert_eq!(reply.body["expires_at"], Value::Null);
    let created_at: Timestamp = reply.body["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at <= Timestamp::now());
}

#[tokio::test]
async fn generated_codes_redirect_to_their_target() {
    let app = random_app();

    let first = shorten(&app, "https://example.com/one", 0).await;
    let second = shorten(&app, "https://example.com/two", 0).await;
    assert_ne!(first, second);
    assert!(ShortCode::new(&first).is_ok());

    let reply = send(&app, get(&format!("/{second}"))).await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.headers[header::LOCATION], "https://example.com/two");
}

#[tokio::test]
async fn expiration_defaults_to_never() {
    let app = random_app();

    let reply = send(&app, shorten_request(json!({ "url": "https://example.com" }))).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let code = reply.body["shortlink"].as_str().unwrap();

    let reply = send(&app, get(&format!("/api/info?shortlink={code}"))).await;
    assert_eq!(reply.body["expires_at"], Value::Null);
}

#[tokio::test]
async fn link_stops_resolving_after_expiry() {
    let clock = ManualClock::new(start());
    let app = clocked_app(clock.clone());

    let code = shorten(&app, "https://example.com", 1).await;

    let reply = send(&app, get(&format!("/{code}"))).await;
    assert_eq!(reply.status, StatusCode::FOUND);

    let reply = send(&app, get(&format!("/api/info?shortlink={code}"))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["created_at"], "2023-11-14T22:13:20Z");
    assert_eq!(reply.body["expires_at"], "2023-11-14T22:14:20Z");

    clock.advance(SignedDuration::from_secs(61));

    let reply = send(&app, get(&format!("/{code}"))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body["error"].is_string());

    let reply = send(&app, get(&format!("/api/info?shortlink={code}"))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_url_is_bad_request() {
    let app = random_app();

    let reply = send(
        &app,
        shorten_request(json!({ "url": "", "expiration_in_minutes": 0 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("URL"));
}

#[tokio::test]
async fn negative_expiration_is_bad_request() {
    let app = random_app();

    let reply = send(
        &app,
        shorten_request(json!({ "url": "https://example.com", "expiration_in_minutes": -1 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = random_app();

    for body in [
        "{not json",
        r#"{"url": 42}"#,
        r#"{"url": "https://example.com", "expiration_in_minutes": "soon"}"#,
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/shorten")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let reply = send(&app, request).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "body={body}");
        assert!(reply.body["error"].is_string());
    }

    let request = Request::builder()
        .method("POST")
        .uri("/api/shorten")
        .body(Body::from(r#"{"url": "https://example.com"}"#))
        .unwrap();
    let reply = send(&app, request).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = random_app();

    // longer than any code, so it cannot exist
    let reply = send(&app, get("/doesNotExist1")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "short link not found" }));

    let reply = send(&app, get("/doesNotExi")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "short link not found" }));
}

#[tokio::test]
async fn info_requires_a_valid_shortlink() {
    let app = random_app();

    let reply = send(&app, get("/api/info")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, get("/api/info?shortlink=not-valid!")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, get("/api/info?shortlink=missing")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exhausted_code_space_is_server_error() {
    let app = fixed_app("taken");

    shorten(&app, "https://first.com", 0).await;
    let reply = send(
        &app,
        shorten_request(json!({ "url": "https://second.com", "expiration_in_minutes": 0 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.body["error"].is_string());
}

#[tokio::test]
async fn storage_failures_hide_details() {
    let service = ShortenerService::new(BrokenRepository, RandomGenerator::default());
    let app = App::router(AppState::new(Arc::new(service)));

    let reply = send(
        &app,
        shorten_request(json!({ "url": "https://example.com", "expiration_in_minutes": 0 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body, json!({ "error": "internal server error" }));

    let reply = send(&app, get("/abc123")).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!reply.body.to_string().contains("secret"));
}

#[tokio::test]
async fn health_check() {
    let app = random_app();

    let reply = send(&app, get("/health")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "status": "ok" }));
}
