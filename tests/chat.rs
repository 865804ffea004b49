mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_with, delete, get, post_json, send};
use mindful_api::config::Config;

fn config_for(server: &MockServer) -> Config {
    Config {
        claude_api_key: "test-key".into(),
        claude_api_url: server.uri(),
        ..Config::default()
    }
}

fn text_reply(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
}

#[tokio::test]
async fn chat_runs_mood_tool_and_persists_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("tool_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            "You've mostly felt great this week. That's wonderful!",
        )))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "type": "text", "text": "Let me look at your week." },
                {
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "getUserMoodAnalysis",
                    "input": { "timeRange": "last7days" }
                }
            ],
            "stop_reason": "tool_use"
        })))
        .mount(&server)
        .await;

    let app = app_with(config_for(&server));
    let today = Utc::now().date_naive();
    for offset in [0, 1] {
        let date = (today - Duration::days(offset)).format("%Y-%m-%d").to_string();
        send(&app, post_json("/api/moods", "u1", json!({ "mood": "great", "date": date }))).await;
    }

    let (status, body) = send(
        &app,
        post_json("/api/chat", "u1", json!({ "message": "How has my week been?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "You've mostly felt great this week. That's wonderful!"
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let tool_result = &second["messages"][2]["content"][0];
    assert_eq!(tool_result["type"], "tool_result");
    assert_eq!(tool_result["tool_use_id"], "toolu_1");
    let analysis: Value = serde_json::from_str(tool_result["content"].as_str().unwrap()).unwrap();
    assert_eq!(analysis["average_score"], 5.0);
    assert_eq!(analysis["distribution"]["great"], 2);

    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["tools"][0]["name"], "getUserMoodAnalysis");
    assert!(first["system"].as_str().unwrap().contains("Sam"));

    let (_, history) = send(&app, get("/api/chat/history", "u1")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[0]["content"], "How has my week been?");
    assert_eq!(history[1]["role"], "assistant");

    let (_, cleared) = send(&app, delete("/api/chat/history", "u1")).await;
    assert_eq!(cleared["deleted"], 2);
}

#[tokio::test]
async fn model_failure_surfaces_as_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let app = app_with(config_for(&server));
    let (status, body) = send(&app, post_json("/api/chat", "u1", json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]["message"].is_string());

    let (_, history) = send(&app, get("/api/chat/history", "u1")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn greeting_uses_model_and_falls_back_on_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("Welcome back, Sam!")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = app_with(config_for(&server));
    let greet = || {
        Request::builder()
            .uri("/api/chat/greeting")
            .header("x-user-id", "u1")
            .header("x-user-name", "Sam")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(&app, greet()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["greeting"], "Welcome back, Sam!");

    let (_, body) = send(&app, greet()).await;
    assert_eq!(
        body["greeting"],
        "Hello, Sam! I'm here to listen. How can I help you today?"
    );
}

#[tokio::test]
async fn chat_is_rate_limited_per_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("ok")))
        .mount(&server)
        .await;

    let app = app_with(Config {
        chat_rate_limit_per_minute: 2,
        ..config_for(&server)
    });

    for _ in 0..2 {
        let (status, _) = send(&app, post_json("/api/chat", "u1", json!({ "message": "hi" }))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&app, post_json("/api/chat", "u1", json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = send(&app, post_json("/api/chat", "u2", json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::OK);
}
