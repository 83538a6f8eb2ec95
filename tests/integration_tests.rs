//! Integration tests for babel-bot
//!
//! These tests run the real HTTP server and the real Telegram, detection and
//! translation clients against wiremock servers, and drive them with webhook
//! updates the way Telegram does.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use babel_bot::{bot::Bot, config::Config, server};

const SECRET: &str = "test-webhook-secret";

// ==================== Test Helpers ====================

/// Create a test config pointing every external service at `mock_url`
fn create_test_config(mock_url: &str) -> Config {
    Config {
        bot_token: "test-token".to_string(),
        bot_id: 4242,
        telegram_api_url: mock_url.to_string(),
        webhook_url: None,
        webhook_secret: Some(SECRET.to_string()),
        detection_api_key: "test-detect-key".to_string(),
        detection_api_url: format!("{mock_url}/0.2/detect"),
        translate_api_url: format!("{mock_url}/translate_a/single"),
        command_prefix: "-".to_string(),
        max_pagination_sessions: 16,
        port: 0,
    }
}

/// Start the webhook server on an ephemeral port, returning its base URL
async fn start_server(config: Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    let app = server::router(Arc::new(Bot::new(config)));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{addr}")
}

async fn post_update(base_url: &str, secret: Option<&str>, update: &Value) -> reqwest::Response {
    let mut request = reqwest::Client::new()
        .post(format!("{base_url}/webhook"))
        .json(update);
    if let Some(secret) = secret {
        request = request.header("X-Telegram-Bot-Api-Secret-Token", secret);
    }
    request.send().await.expect("Failed to post update")
}

/// Bodies of the requests made to Telegram `method_name`, waiting up to two
/// seconds for at least `count` of them (updates are handled in the background)
async fn wait_for_calls(mock: &MockServer, method_name: &str, count: usize) -> Vec<Value> {
    let suffix = format!("/{method_name}");

    for _ in 0..40 {
        let bodies: Vec<Value> = mock
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().ends_with(&suffix))
            .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
            .collect();
        if bodies.len() >= count {
            return bodies;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    panic!("Timed out waiting for {count} {method_name} call(s)");
}

async fn mount_telegram_ok(mock: &MockServer, method_name: &str, result: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/bottest-token/{method_name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": result,
        })))
        .mount(mock)
        .await;
}

fn message_update(update_id: i64, text: &str, reply_to: Option<Value>) -> Value {
    let mut message = json!({
        "message_id": 100 + update_id,
        "from": {"id": 10, "is_bot": false, "first_name": "Ana"},
        "chat": {"id": -500, "type": "supergroup"},
        "date": 1700000000,
        "text": text,
    });
    if let Some(reply_to) = reply_to {
        message["reply_to_message"] = reply_to;
    }
    json!({ "update_id": update_id, "message": message })
}

// ==================== HTTP Surface Tests ====================

#[tokio::test]
async fn test_health_check() {
    let mock = MockServer::start().await;
    let base_url = start_server(create_test_config(&mock.uri())).await;

    let response = reqwest::get(format!("{base_url}/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_webhook_rejects_wrong_secret() {
    let mock = MockServer::start().await;
    let base_url = start_server(create_test_config(&mock.uri())).await;
    let update = message_update(1, "-h", None);

    let wrong = post_update(&base_url, Some("guess"), &update).await;
    let missing = post_update(&base_url, None, &update).await;

    assert_eq!(wrong.status(), 401);
    assert_eq!(missing.status(), 401);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_acknowledges_malformed_update() {
    let mock = MockServer::start().await;
    let base_url = start_server(create_test_config(&mock.uri())).await;

    let response = post_update(&base_url, Some(SECRET), &json!({"not": "an update"})).await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_webhook_without_configured_secret_accepts_all() {
    let mock = MockServer::start().await;
    mount_telegram_ok(&mock, "sendMessage", json!({"message_id": 1})).await;

    let mut config = create_test_config(&mock.uri());
    config.webhook_secret = None;
    let base_url = start_server(config).await;

    let response = post_update(&base_url, None, &message_update(2, "-e hello", None)).await;
    assert_eq!(response.status(), 200);

    let sent = wait_for_calls(&mock, "sendMessage", 1).await;
    assert_eq!(sent[0]["text"], "hello");
}

// ==================== Translate Flow Tests ====================

#[tokio::test]
async fn test_translate_reply_end_to_end() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/0.2/detect"))
        .and(header("authorization", "Bearer test-detect-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"detections": [{"language": "es", "isReliable": true, "confidence": 9.1}]}
        })))
        .expect(1)
        .mount(&mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "es"))
        .and(query_param("tl", "fr"))
        .and(query_param("q", "Hola mundo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [["Bonjour le monde", "Hola mundo", null, null, 10]],
            null,
            "es"
        ])))
        .expect(1)
        .mount(&mock)
        .await;

    mount_telegram_ok(&mock, "sendMessage", json!({"message_id": 900})).await;

    let base_url = start_server(create_test_config(&mock.uri())).await;
    let replied = json!({
        "message_id": 50,
        "from": {"id": 11, "is_bot": false, "first_name": "Luis"},
        "chat": {"id": -500, "type": "supergroup"},
        "text": "*Hola mundo*"
    });

    let response = post_update(&base_url, Some(SECRET), &message_update(3, "-t French", Some(replied))).await;
    assert_eq!(response.status(), 200);

    let sent = wait_for_calls(&mock, "sendMessage", 1).await;
    assert_eq!(sent[0]["chat_id"], -500);
    assert_eq!(sent[0]["text"], "**Bonjour le monde** (Spanish -> French)");
    assert_eq!(sent[0]["reply_parameters"]["message_id"], 103);
    assert!(sent[0].get("parse_mode").is_none());
}

#[tokio::test]
async fn test_translate_invalid_language_skips_services() {
    let mock = MockServer::start().await;
    mount_telegram_ok(&mock, "sendMessage", json!({"message_id": 901})).await;

    let base_url = start_server(create_test_config(&mock.uri())).await;
    let replied = json!({
        "message_id": 51,
        "chat": {"id": -500},
        "text": "Hola"
    });

    post_update(&base_url, Some(SECRET), &message_update(4, "-t elvish", Some(replied))).await;

    let sent = wait_for_calls(&mock, "sendMessage", 1).await;
    assert_eq!(
        sent[0]["text"],
        "Error: `elvish` is not a valid language.\nUsage: Reply to a message with `-t <language>`."
    );

    let service_calls = mock
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| !request.url.path().starts_with("/bot"))
        .count();
    assert_eq!(service_calls, 0);
}

// ==================== Listing Flow Tests ====================

#[tokio::test]
async fn test_listing_page_turn_end_to_end() {
    let mock = MockServer::start().await;
    mount_telegram_ok(&mock, "sendMessage", json!({"message_id": 777})).await;
    mount_telegram_ok(&mock, "editMessageText", json!({"message_id": 777})).await;
    mount_telegram_ok(&mock, "answerCallbackQuery", json!(true)).await;

    let base_url = start_server(create_test_config(&mock.uri())).await;

    post_update(&base_url, Some(SECRET), &message_update(5, "-l", None)).await;

    let sent = wait_for_calls(&mock, "sendMessage", 1).await;
    assert_eq!(sent[0]["parse_mode"], "Markdown");
    assert!(sent[0]["text"].as_str().unwrap().contains("SUPPORTED LANGUAGES (1 of 7)"));
    assert_eq!(
        sent[0]["reply_markup"]["inline_keyboard"][0],
        json!([
            {"text": "◀️", "callback_data": "page:prev"},
            {"text": "▶️", "callback_data": "page:next"},
        ])
    );

    let press = json!({
        "update_id": 6,
        "callback_query": {
            "id": "cb-42",
            "from": {"id": 10, "is_bot": false, "first_name": "Ana"},
            "message": {"message_id": 777, "chat": {"id": -500, "type": "supergroup"}},
            "data": "page:next"
        }
    });
    post_update(&base_url, Some(SECRET), &press).await;

    let edits = wait_for_calls(&mock, "editMessageText", 1).await;
    assert_eq!(edits[0]["chat_id"], -500);
    assert_eq!(edits[0]["message_id"], 777);
    assert!(edits[0]["text"].as_str().unwrap().contains("SUPPORTED LANGUAGES (2 of 7)"));

    let answers = wait_for_calls(&mock, "answerCallbackQuery", 1).await;
    assert_eq!(answers[0]["callback_query_id"], "cb-42");
}

// ==================== Calculate Flow Tests ====================

#[tokio::test]
async fn test_calculate_end_to_end() {
    let mock = MockServer::start().await;
    mount_telegram_ok(&mock, "sendMessage", json!({"message_id": 1})).await;

    let base_url = start_server(create_test_config(&mock.uri())).await;
    post_update(&base_url, Some(SECRET), &message_update(7, "-c floor(7 / 2) ^ 2", None)).await;

    let sent = wait_for_calls(&mock, "sendMessage", 1).await;
    assert_eq!(sent[0]["text"], "Total: **9**");
}
