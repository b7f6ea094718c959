// Outbound integrations against a local mock server

use axum::http::StatusCode;
use research_hub::clients::mailer::OutgoingEmail;
use research_hub::clients::{AiClient, DropboxStorage, FileStorage, GenerateError, Mailer, ScholarSearchClient};
use research_hub::config::{AiConfig, MailConfig, SearchConfig, StorageConfig};
use research_hub::db::models::ai::ChatTurn;
use research_hub::error::AppError;
use research_hub::utils::RetryPolicy;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ai_client(server: &MockServer, policy: RetryPolicy) -> AiClient {
    AiClient::new(
        reqwest::Client::new(),
        AiConfig {
            api_key: Some("g-key".to_string()),
            text_model: "text-model".to_string(),
            chat_model: "chat-model".to_string(),
            base_url: server.uri(),
            timeout_ms: 5_000,
        },
    )
    .with_policy(policy)
}

fn fast_policy(overall: Duration) -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
        overall_timeout: overall,
    }
}

fn candidate(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

#[tokio::test]
async fn summarize_retries_after_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"/models/text-model:generateContent$"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "status": "RESOURCE_EXHAUSTED", "message": "quota" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/models/text-model:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("- finding one")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ai_client(&server, fast_policy(Duration::from_secs(5)));
    let summary = client.summarize("Some long paper text", None).await.unwrap();
    assert_eq!(summary, "- finding one");
}

#[tokio::test]
async fn rate_limits_give_up_after_two_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "error": { "message": "slow down" } })))
        .expect(3)
        .mount(&server)
        .await;

    let client = ai_client(&server, fast_policy(Duration::from_secs(5)));
    let err = client.chat("hello", &[]).await.unwrap_err();
    assert!(matches!(err, GenerateError::RateLimited(_)));
    assert_eq!(
        AppError::from(err).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn slow_provider_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate("late"))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let client = ai_client(&server, fast_policy(Duration::from_millis(100)));
    let err = client.summarize("text", None).await.unwrap_err();
    assert!(matches!(err, GenerateError::Timeout));
    assert_eq!(AppError::from(err).status_code(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn chat_uses_chat_model_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"/models/chat-model:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Sure.")))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        ChatTurn {
            role: "user".to_string(),
            text: "Explain p-values".to_string(),
        },
        ChatTurn {
            role: "model".to_string(),
            text: "A p-value is...".to_string(),
        },
    ];
    let client = ai_client(&server, fast_policy(Duration::from_secs(5)));
    assert_eq!(client.chat("Shorter please", &history).await.unwrap(), "Sure.");
}

fn search_client(server: &MockServer, api_key: Option<&str>) -> ScholarSearchClient {
    ScholarSearchClient::new(
        reqwest::Client::new(),
        SearchConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.uri(),
        },
    )
}

#[tokio::test]
async fn search_maps_organic_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_scholar"))
        .and(query_param("q", "graph neural networks"))
        .and(query_param("as_ylo", "2021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {
                    "result_id": "r1",
                    "title": "GNN survey",
                    "link": "https://example.org/gnn",
                    "snippet": "A survey.",
                    "publication_info": {
                        "summary": "A Author - Journal (2022) - example.org",
                        "authors": [{ "name": "A Author" }]
                    }
                },
                { "title": "Second" },
                { "title": "Third" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = search_client(&server, Some("s-key"))
        .search("graph neural networks", Some(2021), 2)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].result_id, "r1");
    assert_eq!(results[0].authors, "A Author");
    assert_eq!(results[0].year, Some(2022));
    assert_eq!(results[1].title, "Second");
}

#[tokio::test]
async fn search_provider_error_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Invalid API key." })))
        .mount(&server)
        .await;

    let err = search_client(&server, Some("bad"))
        .search("x", None, 5)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn search_http_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = search_client(&server, Some("k"))
        .search("x", None, 5)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn search_without_key_is_a_server_error() {
    let server = MockServer::start().await;
    let err = search_client(&server, None)
        .search("x", None, 5)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

fn dropbox(server: &MockServer) -> DropboxStorage {
    DropboxStorage::from_config(
        reqwest::Client::new(),
        StorageConfig {
            refresh_token: Some("refresh".to_string()),
            app_key: Some("app".to_string()),
            app_secret: Some("secret".to_string()),
            api_url: server.uri(),
            content_url: server.uri(),
            root: "/research-hub".to_string(),
        },
    )
    .expect("storage credentials are set")
}

async fn mount_token_and_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short-lived",
            "expires_in": 14400
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .and(header("authorization", "Bearer short-lived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path_display": "/research-hub/avatars/a.png"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn storage_reuses_cached_token_and_returns_raw_links() {
    let server = MockServer::start().await;
    mount_token_and_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://www.dropbox.com/s/abc/a.png?dl=0"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let storage = dropbox(&server);
    let first = storage.upload("avatars/a.png", vec![1, 2, 3], "image/png").await.unwrap();
    let second = storage.upload("avatars/a.png", vec![4, 5, 6], "image/png").await.unwrap();

    assert_eq!(first, "https://www.dropbox.com/s/abc/a.png?raw=1");
    assert_eq!(second, first);
    assert_eq!(storage.name(), "dropbox");
}

#[tokio::test]
async fn storage_falls_back_to_existing_shared_link() {
    let server = MockServer::start().await;
    mount_token_and_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "shared_link_already_exists/"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/list_shared_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": [{ "url": "https://www.dropbox.com/s/old/a.png?dl=0" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = dropbox(&server)
        .upload("avatars/a.png", vec![1], "image/png")
        .await
        .unwrap();
    assert_eq!(url, "https://www.dropbox.com/s/old/a.png?raw=1");
}

#[tokio::test]
async fn rejected_token_refresh_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let err = dropbox(&server).access_token().await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn mailer_posts_to_email_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_key"))
        .and(body_json(json!({
            "from": "hub@example.org",
            "to": ["ada@example.com"],
            "subject": "Hello",
            "text": "Body"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = Mailer::new(
        reqwest::Client::new(),
        MailConfig {
            api_key: Some("re_key".to_string()),
            base_url: server.uri(),
            from: "hub@example.org".to_string(),
        },
    );
    assert!(mailer.is_configured());
    mailer
        .send(&OutgoingEmail {
            to: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            text: "Body".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn mailer_without_key_only_logs() {
    let mailer = Mailer::new(
        reqwest::Client::new(),
        MailConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            from: "hub@example.org".to_string(),
        },
    );
    assert!(!mailer.is_configured());
    assert!(
        mailer
            .send(&OutgoingEmail {
                to: "ada@example.com".to_string(),
                subject: "Hello".to_string(),
                text: "Body".to_string(),
            })
            .await
            .is_ok()
    );
}
