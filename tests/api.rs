use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use qrtrace::api::{build_router, AppState};
use qrtrace::classify::ClassificationGate;
use qrtrace::config::AppConfig;
use qrtrace::db::Database;
use qrtrace::inspect::{InspectionOutcome, Inspector};
use qrtrace::notify::LogNotifier;
use qrtrace::pipeline::SubmissionPipeline;

struct StubInspector;

#[async_trait]
impl Inspector for StubInspector {
    async fn inspect(&self, _payload: &str, _key: &str) -> InspectionOutcome {
        InspectionOutcome::NotBrowsable
    }
}

fn create_test_state() -> AppState {
    let db = Database::in_memory().unwrap();
    let config = AppConfig::default();
    let pipeline = Arc::new(SubmissionPipeline::new(
        db.clone(),
        Arc::new(StubInspector),
        ClassificationGate::new(None, 0.7, true),
        Arc::new(LogNotifier),
        config.clone(),
    ));
    AppState::new(db, config, pipeline)
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn get(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, form: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    let response = app(&state).oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_submissions"], 0);
    assert_eq!(body["stats"]["total_unique_codes"], 0);
}

#[tokio::test]
async fn test_list_codes_empty() {
    let state = create_test_state();
    let response = app(&state).oneshot(get("/api/codes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["codes"].as_array().unwrap().len(), 0);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_list_and_get_codes() {
    let state = create_test_state();
    let (code, _) = state.db.find_or_create_code("https://example.com").unwrap();
    state.db.find_or_create_code("https://other.example").unwrap();

    let response = app(&state).oneshot(get("/api/codes")).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["codes"].as_array().unwrap().len(), 2);

    let response = app(&state).oneshot(get(&format!("/api/codes/{}", code.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["qr_content"], "https://example.com");
    assert_eq!(body["times_found"], 1);
}

#[tokio::test]
async fn test_get_unknown_code_404() {
    let state = create_test_state();
    let response = app(&state).oneshot(get("/api/codes/not-a-real-id")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sightings_for_unknown_code_404() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(get("/api/codes/not-a-real-id/sightings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sightings_listing() {
    let state = create_test_state();
    let (code, _) = state.db.find_or_create_code("https://example.com").unwrap();
    let sighting = qrtrace::models::NewSighting {
        timestamp: chrono::Utc::now().to_rfc3339(),
        submitted_by: Some("+15550001111".to_string()),
        ..Default::default()
    };
    state.db.finalize_submission(&code.id, &sighting, None, None).unwrap();

    let response = app(&state)
        .oneshot(get(&format!("/api/codes/{}/sightings", code.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["sightings"].as_array().unwrap().len(), 1);
    assert_eq!(body["sightings"][0]["submitted_by"], "+15550001111");
}

#[tokio::test]
async fn test_webhook_without_media_acks() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(post_form("/webhook/sms", "From=%2B15550001111&Body=hello&NumMedia=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (parts, body) = response.into_parts();
    let content_type = parts.headers.get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/xml");
    let bytes = body.collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<Response></Response>"));

    // Nothing was processed or stored
    assert_eq!(state.db.list_codes(10, 0).unwrap().len(), 0);
}

#[tokio::test]
async fn test_webhook_with_unreachable_media_still_acks() {
    let state = create_test_state();
    let form = "From=%2B15550001111&NumMedia=1&MediaUrl0=http%3A%2F%2F127.0.0.1%3A9%2Fmissing.jpg";
    let response = app(&state).oneshot(post_form("/webhook/sms", form)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.db.list_codes(10, 0).unwrap().len(), 0);
}
