mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{app, app_with_broken_store, delete, get, post_json, send};

fn days_ago(n: i64) -> String {
    (Utc::now().date_naive() - Duration::days(n))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let req = Request::builder().uri("/readyz").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"], "ok");
}

#[tokio::test]
async fn api_requires_user_id() {
    let app = app();
    let req = Request::builder().uri("/api/trends").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "User ID is required.");
}

#[tokio::test]
async fn definitions_list_all_moods_in_order() {
    let app = app();
    let (status, body) = send(&app, get("/api/moods/definitions", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["awful", "bad", "neutral", "good", "great"]);
    assert_eq!(body[4]["score"], 5);
    assert!(body[0]["style"]["icon"].is_string());
}

#[tokio::test]
async fn log_mood_validates_fields() {
    let app = app();

    let (status, body) = send(&app, post_json("/api/moods", "u1", json!({ "date": days_ago(0) }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "Mood is required.");

    let (status, body) = send(&app, post_json("/api/moods", "u1", json!({ "mood": "good" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "Date is required.");

    let (status, _) = send(
        &app,
        post_json("/api/moods", "u1", json!({ "mood": "fantastic", "date": days_ago(0) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn logged_moods_feed_trends_and_history() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/moods",
            "u1",
            json!({ "mood": "great", "date": days_ago(1), "notes": "hike" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["mood"], "great");
    assert_eq!(body["entry"]["notes"], "hike");

    send(&app, post_json("/api/moods", "u1", json!({ "mood": "neutral", "date": days_ago(0) }))).await;
    // Outside the 7 day window.
    send(&app, post_json("/api/moods", "u1", json!({ "mood": "awful", "date": days_ago(10) }))).await;
    // Someone else's data.
    send(&app, post_json("/api/moods", "u2", json!({ "mood": "awful", "date": days_ago(0) }))).await;

    let (status, trends) = send(&app, get("/api/trends?range=last7days", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trends["is_empty"], false);
    assert_eq!(trends["average_score"], 4.0);
    assert_eq!(trends["distribution"]["great"], 1);
    assert_eq!(trends["distribution"]["neutral"], 1);
    assert_eq!(trends["distribution"]["awful"], 0);
    assert_eq!(trends["period_start"], days_ago(6));
    assert_eq!(trends["period_end"], days_ago(0));

    let (_, monthly) = send(&app, get("/api/trends?range=last30days", "u1")).await;
    assert_eq!(monthly["distribution"]["awful"], 1);

    let (status, history) = send(&app, get("/api/moods?limit=2", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    let moods: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["mood"].as_str().unwrap())
        .collect();
    assert_eq!(moods, vec!["neutral", "great"]);
}

#[tokio::test]
async fn empty_trends_are_not_an_error() {
    let app = app();
    let (status, body) = send(&app, get("/api/trends", "nobody")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_empty"], true);
    assert_eq!(body["summary"], "No mood data logged for this period.");
    assert!(body.get("average_score").is_none());
    assert!(body.get("distribution").is_none());
}

#[tokio::test]
async fn charts_group_by_day_in_both_modes() {
    let app = app();
    for (mood, day) in [("good", 2), ("bad", 2), ("great", 0)] {
        send(&app, post_json("/api/moods", "u1", json!({ "mood": mood, "date": days_ago(day) }))).await;
    }

    let (status, dist) = send(&app, get("/api/charts?range=weekly&mode=distribution", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dist["mode"], "distribution");
    let points = dist["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["date"], days_ago(2));
    assert_eq!(points[0]["good"], 1);
    assert_eq!(points[0]["bad"], 1);
    assert_eq!(points[0]["awful"], 0);

    let (_, avg) = send(&app, get("/api/charts?range=monthly&mode=average", "u1")).await;
    assert_eq!(avg["mode"], "average");
    let points = avg["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["average_score"], 3.0);
    assert_eq!(points[1]["average_score"], 5.0);
}

#[tokio::test]
async fn delete_single_entry_is_idempotent() {
    let app = app();
    let (_, body) = send(&app, post_json("/api/moods", "u1", json!({ "mood": "good", "date": days_ago(0) }))).await;
    let id = body["entry"]["id"].as_str().unwrap().to_string();

    // Another user cannot remove it.
    send(&app, delete(&format!("/api/moods/{id}"), "u2")).await;
    let (_, history) = send(&app, get("/api/moods", "u1")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let (status, body) = send(&app, delete(&format!("/api/moods/{id}"), "u1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);
    }
    let (_, history) = send(&app, get("/api/moods", "u1")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_all_clears_only_the_caller() {
    let app = app();
    send(&app, post_json("/api/moods", "u1", json!({ "mood": "good", "date": days_ago(0) }))).await;
    send(&app, post_json("/api/moods", "u1", json!({ "mood": "bad", "date": days_ago(1) }))).await;
    send(&app, post_json("/api/moods", "u2", json!({ "mood": "bad", "date": days_ago(1) }))).await;

    let (status, body) = send(&app, delete("/api/moods", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);

    let (_, body) = send(&app, delete("/api/moods", "u1")).await;
    assert_eq!(body["deleted"], 0);
    assert_eq!(body["message"], "No mood data found to delete.");

    let (_, trends) = send(&app, get("/api/trends", "u1")).await;
    assert_eq!(trends["is_empty"], true);
    let (_, other) = send(&app, get("/api/moods", "u2")).await;
    assert_eq!(other.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn chat_without_model_key_is_unavailable_but_greeting_falls_back() {
    let app = app();
    let (status, _) = send(&app, post_json("/api/chat", "u1", json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let req = Request::builder()
        .uri("/api/chat/greeting")
        .header("x-user-id", "u1")
        .header("x-user-name", "Sam")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["greeting"],
        "Hello, Sam! I'm here to listen. How can I help you today?"
    );
}

#[tokio::test]
async fn queries_default_to_the_weekly_view() {
    let app = app();
    send(&app, post_json("/api/moods", "u1", json!({ "mood": "good", "date": days_ago(0) }))).await;

    let (_, trends) = send(&app, get("/api/trends", "u1")).await;
    assert_eq!(trends["period_start"], days_ago(6));

    let (_, chart) = send(&app, get("/api/charts", "u1")).await;
    assert_eq!(chart["range"], "weekly");
    assert_eq!(chart["mode"], "distribution");
    assert_eq!(chart["period_start"], days_ago(6));
}

#[tokio::test]
async fn store_outage_is_reported_without_details() {
    let app = app_with_broken_store();

    let (status, body) = send(&app, get("/api/trends?range=last30days", "u1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], 500);
    assert_eq!(body["error"]["message"], "Mood data is temporarily unavailable");

    let (status, _) = send(
        &app,
        post_json("/api/moods", "u1", json!({ "mood": "good", "date": days_ago(0) })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let req = Request::builder().uri("/readyz").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["store"], "failed");
}
