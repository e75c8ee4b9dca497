// ABOUTME: End-to-end router tests with mocked model and datastore services
// ABOUTME: Exercises generate, save, chat, delete-deck, and probe endpoints
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use recall_api::config::{CorsConfig, LlmConfig, ServerConfig, StoreConfig};
use recall_api::resources::ServerResources;
use recall_api::server::ApiServer;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_router(store: &MockServer, llm: &MockServer, debug_responses: bool) -> Router {
    let config = ServerConfig {
        http_port: 0,
        llm: LlmConfig {
            api_key: "test-key".into(),
            base_url: llm.uri(),
            model: "gpt-4o-mini".into(),
        },
        store: StoreConfig {
            base_url: store.uri(),
            service_key: "service-key".into(),
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
        prompt_template_path: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("prompts/flashcards.md"),
        debug_responses,
    };
    let resources = Arc::new(ServerResources::new(config).unwrap());
    ApiServer::new(resources).router()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn mock_profile(store: &MockServer, tokens_used: u64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "tokens_used": tokens_used }])),
        )
        .mount(store)
        .await;
}

fn completion_body(content: &str, total_tokens: u32) -> Value {
    json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": total_tokens / 2,
            "completion_tokens": total_tokens - total_tokens / 2,
            "total_tokens": total_tokens
        }
    })
}

#[tokio::test]
async fn test_generate_happy_path() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    let reply = "```json\n{\"flashcards\": [{\"question\": \"Q1\", \"answer\": \"A1\"}]}\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply, 100)))
        .expect(1)
        .mount(&llm)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/generate",
        json!({ "userId": "user-1", "topic": "Photosynthesis", "numCards": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcards"][0]["question"], "Q1");
    assert_eq!(body["flashcards"][0]["answer"], "A1");
    // Debug fields stay hidden in production mode
    assert!(body.get("raw_output").is_none());
    assert!(body.get("prompt_sent").is_none());
}

#[tokio::test]
async fn test_generate_debug_mode_exposes_artifacts() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    let reply = "{\"flashcards\": [{\"question\": \"Q\", \"answer\": \"A\"}]}";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply, 50)))
        .mount(&llm)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, true),
        "/api/generate",
        json!({ "userId": "user-1", "topic": "Rust lifetimes", "numCards": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["raw_output"], reply);
    assert!(body["prompt_sent"]
        .as_str()
        .unwrap()
        .contains("Rust lifetimes"));
}

#[tokio::test]
async fn test_generate_missing_topic_is_rejected_before_any_call() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/generate",
        json!({ "userId": "user-1", "topic": "   ", "numCards": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(store.received_requests().await.unwrap().len(), 0);
    assert_eq!(llm.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_generate_empty_user_id_is_unauthorized() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/generate",
        json!({ "userId": "", "topic": "Photosynthesis" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_generate_over_quota_is_429() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 100_000).await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/generate",
        json!({ "userId": "user-1", "topic": "Photosynthesis" }),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "QUOTA_EXCEEDED");
    // The model is never consulted for an over-quota user
    assert_eq!(llm.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_generate_unparseable_model_reply_is_500() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Sorry, I cannot do that.", 20)),
        )
        .mount(&llm)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/generate",
        json!({ "userId": "user-1", "topic": "Photosynthesis" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_save_deck() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/flashcards"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/save",
        json!({
            "userId": "user-1",
            "deckName": "Biology",
            "flashcards": [{ "question": "Q", "answer": "A" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully created deck 'Biology'!");
}

#[tokio::test]
async fn test_save_deck_rejects_empty_card_list() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/save",
        json!({ "userId": "user-1", "deckName": "Biology", "flashcards": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert_eq!(store.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_save_deck_requires_user_id() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/save",
        json!({
            "userId": "",
            "deckName": "Biology",
            "flashcards": [{ "question": "Q", "answer": "A" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(store.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_deck_requires_user_id() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/delete-deck",
        json!({ "userId": "", "deckName": "Biology" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(store.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_save_deck_requires_deck_name() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/save",
        json!({ "userId": "user-1", "flashcards": [{ "question": "Q", "answer": "A" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_delete_deck_with_no_matching_rows_is_not_an_error() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/flashcards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/delete-deck",
        json!({ "userId": "user-1", "deckName": "Biology" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No cards found for deck 'Biology'.");
    assert_eq!(body["deleted"], 0);
}

#[tokio::test]
async fn test_delete_deck_reports_removed_count() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/flashcards"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])),
        )
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/delete-deck",
        json!({ "userId": "user-1", "deckName": "Biology" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);
}

#[tokio::test]
async fn test_chat_bills_token_usage() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello!", 42)))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/increment_tokens_used"))
        .and(body_json(json!({ "p_user_id": "user-1", "p_amount": 42 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/chat",
        json!({
            "userId": "user-1",
            "messages": [{ "role": "user", "content": "hi" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Hello!");
    assert_eq!(body["token_info"]["total_tokens"], 42);
}

#[tokio::test]
async fn test_chat_without_usage_never_fires_increment() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": "Hi" },
                "finish_reason": "stop"
            }]
        })))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/increment_tokens_used"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/chat",
        json!({
            "userId": "user-1",
            "messages": [{ "role": "user", "content": "hi" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_info"]["total_tokens"], 0);
}

#[tokio::test]
async fn test_chat_billing_failure_forfeits_reply() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    mock_profile(&store, 10).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello!", 42)))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/increment_tokens_used"))
        .respond_with(ResponseTemplate::new(500).set_body_string("rpc down"))
        .mount(&store)
        .await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/chat",
        json!({
            "userId": "user-1",
            "messages": [{ "role": "user", "content": "hi" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_chat_rejects_empty_history() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let (status, body) = post_json(
        test_router(&store, &llm, false),
        "/api/chat",
        json!({ "userId": "user-1", "messages": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

async fn get_status(router: Router, uri: &str) -> StatusCode {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_health_probe_is_unconditional() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;

    let status = get_status(test_router(&store, &llm, false), "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_probe_checks_model_service() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&llm)
        .await;

    let status = get_status(test_router(&store, &llm, false), "/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_probe_unavailable_when_model_service_down() {
    let store = MockServer::start().await;
    let llm = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&llm)
        .await;

    let status = get_status(test_router(&store, &llm, false), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
