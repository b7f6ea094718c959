// Routing and middleware behavior that does not reach the database

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use diesel::{
    PgConnection,
    r2d2::{self, ConnectionManager},
};
use research_hub::{AppState, build_app, config::Config};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn config(extra: &[(&str, &str)]) -> Config {
    let mut vars = vec![
        ("DATABASE_URL".to_string(), "postgres://127.0.0.1:1/unreachable".to_string()),
        ("JWT_SECRET".to_string(), "router-test-secret".to_string()),
        ("REDIS_URL".to_string(), "redis://127.0.0.1:1/".to_string()),
    ];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_vars(vars).unwrap()
}

fn app(extra: &[(&str, &str)]) -> Router {
    let config = config(extra);
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let db = r2d2::Pool::builder()
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(300))
        .build_unchecked(manager);
    let redis = redis::Client::open(config.redis_url.as_str()).unwrap();
    build_app(Arc::new(AppState::new(db, redis, config).unwrap()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_is_ok_with_security_headers() {
    let response = app(&[]).oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/healthz")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app(&[]).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn readyz_reports_unreachable_database() {
    let response = app(&[]).oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "not-ready");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    for uri in [
        "/api/users/me",
        "/api/projects",
        "/api/library",
        "/api/notifications",
        "/api/admin/users",
        "/api/superadmin/audit-logs",
    ] {
        let response = app(&[]).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
    let request = Request::builder()
        .uri("/api/settings")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app(&[]).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn malformed_login_body_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&[]).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_login_fields_are_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"","password":""}"#))
        .unwrap();
    let response = app(&[]).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn plain_http_is_redirected_when_https_is_enforced() {
    let request = Request::builder()
        .uri("/healthz?x=1")
        .header(header::HOST, "hub.example.org")
        .body(Body::empty())
        .unwrap();
    let response = app(&[("ENFORCE_HTTPS", "true")]).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://hub.example.org/healthz?x=1"
    );
}

#[tokio::test]
async fn forwarded_https_passes_through() {
    let request = Request::builder()
        .uri("/healthz")
        .header(header::HOST, "hub.example.org")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let response = app(&[("ENFORCE_HTTPS", "true")]).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let response = app(&[]).oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
