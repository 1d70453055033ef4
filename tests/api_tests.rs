use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use keisan::config::AppConfig;
use keisan::routes::build_router;
use keisan::state::AppState;

fn app() -> Router {
    build_router(Arc::new(AppState::new(AppConfig::default())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))
    };
    (status, json)
}

#[tokio::test]
async fn health_and_catalog() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, body) = send(&app, "GET", "/api/v1/grades", None).await;
    assert_eq!(body["grades"].as_array().unwrap().len(), 6);
    assert_eq!(body["grades"][3]["grade"], "中1");
    assert_eq!(body["difficulties"][0]["difficulty"], "基礎");

    let (status, body) = send(&app, "GET", "/api/v1/topics?grade=m1", None).await;
    assert_eq!(status, StatusCode::OK);
    let topics = body.as_array().unwrap();
    assert_eq!(topics.len(), 12);
    assert!(topics.iter().all(|t| t["ready"] == true));

    let (_, body) = send(&app, "GET", "/api/v1/topics", None).await;
    assert_eq!(body.as_array().unwrap().len(), 55);
}

#[tokio::test]
async fn quiz_session_flow() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/quiz",
        Some(json!({ "topicId": "m3_factorization_basic", "count": 10, "difficulty": "basic" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "中3");
    assert_eq!(body["difficulty"], "基礎");
    assert_eq!(body["maxAttempts"], 3);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert!(questions[0].get("answer").is_none());
    assert!(questions[0]["textHtml"].as_str().unwrap().contains("x<sup>2</sup>"));
    let id = body["sessionId"].as_str().unwrap().to_string();

    // Out-of-order operations are conflicts.
    let (status, _) = send(&app, "POST", &format!("/api/v1/quiz/{id}/next"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "POST", &format!("/api/v1/quiz/{id}/finish"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Three wrong answers reveal the first question.
    for left in [2, 1, 0] {
        let (status, fb) = send(&app, "POST", &format!("/api/v1/quiz/{id}/answer"), Some(json!({ "answer": "0" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fb["correct"], false);
        assert_eq!(fb["attemptsLeft"], left);
    }
    let (_, fb) = send(&app, "POST", &format!("/api/v1/quiz/{id}/answer"), Some(json!({ "answer": "1" }))).await;
    assert!(fb["error"].is_string());

    let (status, _) = send(&app, "POST", &format!("/api/v1/quiz/{id}/answer"), Some(json!({ "answer": " " }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    for _ in 0..9 {
        let (status, next) = send(&app, "POST", &format!("/api/v1/quiz/{id}/next"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(next["complete"], false);
        let (_, fb) = send(&app, "POST", &format!("/api/v1/quiz/{id}/skip"), None).await;
        assert_eq!(fb["skipped"], true);
        assert!(fb["answer"].as_str().unwrap().starts_with("(x+"));
    }
    let (_, next) = send(&app, "POST", &format!("/api/v1/quiz/{id}/next"), None).await;
    assert_eq!(next["complete"], true);

    let (status, result) = send(&app, "POST", &format!("/api/v1/quiz/{id}/finish"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total"], 10);
    assert_eq!(result["score"], 0);
    assert_eq!(result["encouragement"], "effort");
    assert_eq!(result["results"][0]["attempts"], 3);
    assert_eq!(result["topic"]["id"], "m3_factorization_basic");

    let (_, history) = send(&app, "GET", "/api/v1/history", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", &format!("/api/v1/quiz/{id}/skip"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quiz_requests_are_validated() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/v1/quiz", Some(json!({ "topicId": "g4_division", "count": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("question count"));

    let (status, _) = send(&app, "POST", "/api/v1/quiz", Some(json!({ "topicId": "h1_calculus", "count": 10 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/v1/quiz/missing/skip", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn check_and_preview() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/v1/check", Some(json!({ "answer": "2m50cm", "expected": "2,50" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["normalizedAnswer"], "2,50");

    let (_, body) = send(&app, "POST", "/api/v1/check", Some(json!({ "answer": "x=5", "expected": "5=x" }))).await;
    assert_eq!(body["correct"], false);

    let (status, body) = send(&app, "GET", "/api/v1/preview?topicId=g6_circle_area&difficulty=basic", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["difficulty"], "基礎");
    assert!(body["question"]["figure"].is_object());
    assert!(!body["answer"].as_str().unwrap().is_empty());
}
