//! Dashboard HTTP API Tests
//!
//! Drives the full router in-process: sessions, predictions, history,
//! CSV download, chart and degraded-model behavior.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use salarydash::http_server::{DashboardState, HttpServer, HttpServerConfig};
use salarydash::model::{ModelLoadError, ModelPort, RegressionModel};
use salarydash::session::{SessionRegistry, SinkPolicy, SinkScope};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn router_with(port: ModelPort, sessions: SessionRegistry) -> Router {
    let state = Arc::new(DashboardState::new(Arc::new(port), sessions));
    HttpServer::new(HttpServerConfig::default(), state).router()
}

fn linear_router() -> Router {
    router_with(
        ModelPort::from_predictor(Arc::new(RegressionModel::linear(30000.0, 9000.0))),
        SessionRegistry::default(),
    )
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_session(router: &Router) -> String {
    let (status, json) = send_json(router, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health and Model
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = linear_router();
    let (status, json) = send_json(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, _) = send_json(&router, Method::GET, "/observability/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_model_status_and_input_bounds() {
    let router = linear_router();

    let (status, json) = send_json(&router, Method::GET, "/model", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "loaded");

    let (_, json) = send_json(&router, Method::GET, "/input", None).await;
    assert_eq!(json["min"], 0.0);
    assert_eq!(json["max"], 20.0);
    assert_eq!(json["step"], 0.5);
    assert_eq!(json["default"], 5.0);
}

// =============================================================================
// Predictions and History
// =============================================================================

#[tokio::test]
async fn test_predict_appends_history() {
    let router = linear_router();
    let id = create_session(&router).await;

    let (status, json) = send_json(
        &router,
        Method::POST,
        &format!("/sessions/{}/predict", id),
        Some(serde_json::json!({ "experience": 2.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["record"]["experience"], 2.5);
    assert_eq!(json["record"]["prediction"], 52500.0);
    assert_eq!(json["record"]["formatted"], "Rs. 52,500.00");
    assert_eq!(json["history_len"], 1);

    // Missing body falls back to the slider default.
    let (status, json) =
        send_json(&router, Method::POST, &format!("/sessions/{}/predict", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["record"]["experience"], 5.0);
    assert_eq!(json["history_len"], 2);

    let (status, json) =
        send_json(&router, Method::GET, &format!("/sessions/{}/history", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["records"][0]["experience"], 2.5);
    assert_eq!(json["records"][1]["experience"], 5.0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let router = linear_router();
    let a = create_session(&router).await;
    let b = create_session(&router).await;

    send_json(&router, Method::POST, &format!("/sessions/{}/predict", a), None).await;

    let (_, json) = send_json(&router, Method::GET, &format!("/sessions/{}/history", b), None).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_invalid_input_rejected() {
    let router = linear_router();
    let id = create_session(&router).await;
    let uri = format!("/sessions/{}/predict", id);

    for experience in [25.0, -1.0, 2.3] {
        let (status, json) = send_json(
            &router,
            Method::POST,
            &uri,
            Some(serde_json::json!({ "experience": experience })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "experience {}", experience);
        assert_eq!(json["code"], 400);
    }

    let (_, json) = send_json(&router, Method::GET, &format!("/sessions/{}/history", id), None).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_malformed_body_rejected_without_append() {
    let router = linear_router();
    let id = create_session(&router).await;

    for raw in [
        r#"{"experience":"twelve"}"#,
        r#"{"experience":12"#,
        r#"{"experiance":12.0}"#,
    ] {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/sessions/{}/predict", id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(raw))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", raw);
    }

    let (_, json) = send_json(&router, Method::GET, &format!("/sessions/{}/history", id), None).await;
    assert_eq!(json["total"], 0);

    let (_, json) = send_json(&router, Method::GET, "/observability/metrics", None).await;
    assert_eq!(json["predictions_recorded"], 0);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let router = linear_router();
    let uri = format!("/sessions/{}/history", uuid::Uuid::new_v4());

    let (status, json) = send_json(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
}

#[tokio::test]
async fn test_end_session() {
    let router = linear_router();
    let id = create_session(&router).await;

    let (status, _) = send(&router, Method::DELETE, &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::GET, &format!("/sessions/{}/history", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// CSV Download
// =============================================================================

#[tokio::test]
async fn test_history_csv_download() {
    let router = linear_router();
    let id = create_session(&router).await;
    send_json(
        &router,
        Method::POST,
        &format!("/sessions/{}/predict", id),
        Some(serde_json::json!({ "experience": 10.0 })),
    )
    .await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/sessions/{}/history.csv", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"salary_predictions_log.csv\""
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "timestamp,experience,prediction");
    assert!(lines[1].ends_with(",10.0,\"Rs. 120,000.00\""));
}

#[tokio::test]
async fn test_predictions_persist_to_shared_log() {
    let temp = TempDir::new().unwrap();
    let router = router_with(
        ModelPort::from_predictor(Arc::new(RegressionModel::linear(30000.0, 9000.0))),
        SessionRegistry::new(SinkPolicy::new(temp.path(), SinkScope::Shared)),
    );
    let id = create_session(&router).await;

    let (_, json) = send_json(&router, Method::POST, &format!("/sessions/{}/predict", id), None).await;
    assert_eq!(json["persisted"], true);

    let on_disk = std::fs::read_to_string(temp.path().join("predictions_log.csv")).unwrap();
    assert!(on_disk.starts_with("timestamp,experience,prediction\n"));
    assert!(on_disk.trim_end().ends_with(",5.0,75000.0"));
}

// =============================================================================
// Chart
// =============================================================================

#[tokio::test]
async fn test_chart_with_marker() {
    let router = linear_router();
    let id = create_session(&router).await;
    let chart_uri = format!("/sessions/{}/chart", id);

    let (status, json) = send_json(&router, Method::GET, &chart_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["curve"]["points"].as_array().unwrap().len(), 100);
    assert!(json["marker"].is_null());
    assert_eq!(json["model_available"], true);

    send_json(
        &router,
        Method::POST,
        &format!("/sessions/{}/predict", id),
        Some(serde_json::json!({ "experience": 4.0 })),
    )
    .await;

    let (_, json) = send_json(&router, Method::GET, &chart_uri, None).await;
    assert_eq!(json["marker"]["input"], 4.0);
    assert_eq!(json["marker"]["output"], 66000.0);
}

#[tokio::test]
async fn test_chart_invalid_domain() {
    let router = linear_router();
    let id = create_session(&router).await;

    let (status, _) = send_json(
        &router,
        Method::GET,
        &format!("/sessions/{}/chart?min=10&max=2", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Degraded Model
// =============================================================================

#[tokio::test]
async fn test_unavailable_model_degrades() {
    let router = router_with(
        ModelPort::unavailable(ModelLoadError::NotFound("best_salary_model.json".to_string())),
        SessionRegistry::default(),
    );
    let id = create_session(&router).await;

    let (status, json) = send_json(&router, Method::POST, &format!("/sessions/{}/predict", id), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], 503);

    let (_, json) = send_json(&router, Method::GET, &format!("/sessions/{}/history", id), None).await;
    assert_eq!(json["total"], 0);

    let (status, json) = send_json(&router, Method::GET, &format!("/sessions/{}/chart", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["curve"]["degraded"], true);
    assert_eq!(json["model_available"], false);

    let (_, json) = send_json(&router, Method::GET, "/observability/metrics", None).await;
    assert_eq!(json["prediction_failures"], 1);
    assert_eq!(json["curves_degraded"], 1);
}
