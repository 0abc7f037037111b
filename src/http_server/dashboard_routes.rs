//! Dashboard HTTP Routes
//!
//! Endpoints behind the salary dashboard: sessions, predictions, history,
//! CSV download and the trend chart.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::curve::{
    CurveCache, CurvePoint, CurveSamples, DEFAULT_DOMAIN_MAX, DEFAULT_DOMAIN_MIN, DEFAULT_POINTS,
};
use crate::ledger::{format_currency, PredictionRecord, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
use crate::model::{ModelPort, ModelStatus};
use crate::observability::{Event, MetricsRegistry};
use crate::session::{InputBounds, SessionError, SessionHandle, SessionRegistry};

/// Upper bound on chart density accepted from clients
pub const MAX_CHART_POINTS: usize = 10_000;

// ==================
// Shared State
// ==================

/// Dashboard state shared across handlers
#[derive(Debug)]
pub struct DashboardState {
    pub model: Arc<ModelPort>,
    pub sessions: SessionRegistry,
    pub curves: CurveCache,
    pub metrics: Arc<MetricsRegistry>,
    pub bounds: InputBounds,
    /// UX pacing applied before each prediction
    pub prediction_delay: Duration,
}

impl DashboardState {
    pub fn new(model: Arc<ModelPort>, sessions: SessionRegistry) -> Self {
        Self {
            model,
            sessions,
            curves: CurveCache::new(),
            metrics: Arc::new(MetricsRegistry::new()),
            bounds: InputBounds::default(),
            prediction_delay: Duration::ZERO,
        }
    }

    pub fn with_bounds(mut self, bounds: InputBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_prediction_delay(mut self, delay: Duration) -> Self {
        self.prediction_delay = delay;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(response: ErrorResponse) -> ApiError {
    let status = StatusCode::from_u16(response.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

fn session_error(err: SessionError) -> ApiError {
    api_error(ErrorResponse::from(err))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: String,
    pub sink: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    /// Years of experience; the slider default when omitted
    #[serde(default)]
    pub experience: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub experience: f64,
    pub prediction: f64,
    pub formatted: String,
}

impl From<&PredictionRecord> for HistoryEntry {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            timestamp: record.timestamp.to_string(),
            experience: record.input,
            prediction: record.output,
            formatted: format_currency(record.output),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub record: HistoryEntry,
    pub history_len: usize,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<HistoryEntry>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub points: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub curve: CurveSamples,
    /// The session's latest prediction, drawn over the curve
    pub marker: Option<CurvePoint>,
    pub model_available: bool,
}

// ==================
// Dashboard Routes
// ==================

/// Create dashboard routes
pub fn dashboard_routes(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/model", get(model_status_handler))
        .route("/input", get(input_bounds_handler))
        .route("/sessions", post(create_session_handler))
        .route("/sessions/:id", axum::routing::delete(end_session_handler))
        .route("/sessions/:id/predict", post(predict_handler))
        .route("/sessions/:id/history", get(history_handler))
        .route("/sessions/:id/history.csv", get(export_handler))
        .route("/sessions/:id/chart", get(chart_handler))
        .with_state(state)
}

fn lock_session(
    handle: &SessionHandle,
) -> Result<std::sync::MutexGuard<'_, crate::session::SessionContext>, ApiError> {
    handle
        .lock()
        .map_err(|_| session_error(SessionError::Internal("Lock poisoned".to_string())))
}

// ==================
// Handlers
// ==================

async fn model_status_handler(State(state): State<Arc<DashboardState>>) -> Json<ModelStatus> {
    Json(state.model.status())
}

async fn input_bounds_handler(State(state): State<Arc<DashboardState>>) -> Json<InputBounds> {
    Json(state.bounds)
}

async fn create_session_handler(
    State(state): State<Arc<DashboardState>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let handle = state.sessions.create().map_err(session_error)?;
    let ctx = lock_session(&handle)?;
    state.metrics.increment_sessions_started();

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            id: ctx.id(),
            created_at: ctx.created_at().to_rfc3339(),
            sink: ctx.ledger().sink_description(),
        }),
    ))
}

async fn end_session_handler(
    State(state): State<Arc<DashboardState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.end(id).map_err(session_error)?;
    state.metrics.add_sessions_ended(1);
    Ok(StatusCode::NO_CONTENT)
}

async fn predict_handler(
    State(state): State<Arc<DashboardState>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let handle = state.sessions.get(id).map_err(session_error)?;
    let experience = match parse_predict_request(&body)?.experience {
        Some(value) => value,
        None => state.bounds.default_input().value(),
    };

    if !state.prediction_delay.is_zero() {
        tokio::time::sleep(state.prediction_delay).await;
    }

    // The ledger rewrites its sink file while the session lock is held
    let task_state = Arc::clone(&state);
    tokio::task::spawn_blocking(move || record_prediction(&task_state, &handle, experience))
        .await
        .map_err(|e| session_error(SessionError::Internal(e.to_string())))?
        .map(Json)
}

/// An empty body means "use the slider default"; anything else must parse
fn parse_predict_request(body: &[u8]) -> Result<PredictRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PredictRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        api_error(ErrorResponse {
            error: format!("Invalid predict request: {}", e),
            code: 400,
        })
    })
}

fn record_prediction(
    state: &DashboardState,
    handle: &SessionHandle,
    experience: f64,
) -> Result<PredictResponse, ApiError> {
    let mut ctx = lock_session(handle)?;

    let appended = ctx
        .predict(&state.model, &state.bounds, experience)
        .map_err(|e| {
            if matches!(e, SessionError::Prediction(_)) {
                state.metrics.increment_prediction_failures();
            }
            session_error(e)
        })?;

    state.metrics.increment_predictions_recorded();
    if !appended.is_persisted() {
        state.metrics.increment_persistence_failures();
    }

    Ok(PredictResponse {
        record: HistoryEntry::from(&appended.record),
        history_len: ctx.ledger().len(),
        persisted: appended.is_persisted(),
        warning: appended.persist_error.map(|e| e.to_string()),
    })
}

async fn history_handler(
    State(state): State<Arc<DashboardState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let handle = state.sessions.get(id).map_err(session_error)?;
    let mut ctx = lock_session(&handle)?;
    ctx.touch();

    let records: Vec<HistoryEntry> = ctx.ledger().all().iter().map(HistoryEntry::from).collect();
    Ok(Json(HistoryResponse {
        total: records.len(),
        records,
    }))
}

async fn export_handler(
    State(state): State<Arc<DashboardState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, HeaderMap, Bytes), ApiError> {
    let handle = state.sessions.get(id).map_err(session_error)?;
    let data = {
        let mut ctx = lock_session(&handle)?;
        ctx.touch();
        tracing::info!(
            event = %Event::LedgerExported,
            session = %id,
            records = ctx.ledger().len(),
            "history exported"
        );
        ctx.ledger().export()
    };
    state.metrics.increment_exports();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(EXPORT_MIME_TYPE));
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((StatusCode::OK, headers, Bytes::from(data)))
}

async fn chart_handler(
    State(state): State<Arc<DashboardState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, ApiError> {
    let handle = state.sessions.get(id).map_err(session_error)?;

    let min = query.min.unwrap_or(DEFAULT_DOMAIN_MIN);
    let max = query.max.unwrap_or(DEFAULT_DOMAIN_MAX);
    let points = query.points.unwrap_or(DEFAULT_POINTS);
    if points > MAX_CHART_POINTS {
        return Err(api_error(ErrorResponse {
            error: format!("points must be at most {}", MAX_CHART_POINTS),
            code: 400,
        }));
    }

    let curve = state
        .curves
        .get_or_sample(&state.model, min, max, points)
        .map_err(|e| {
            api_error(ErrorResponse {
                error: e.to_string(),
                code: e.status_code(),
            })
        })?;
    state.metrics.record_curve(curve.degraded);

    let marker = {
        let mut ctx = lock_session(&handle)?;
        ctx.touch();
        ctx.last_prediction().map(|r| CurvePoint {
            input: r.input,
            output: r.output,
        })
    };

    Ok(Json(ChartResponse {
        curve: (*curve).clone(),
        marker,
        model_available: state.model.is_available(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Timestamp;

    #[test]
    fn test_history_entry_formats_currency() {
        let record = PredictionRecord {
            timestamp: "2025-01-01 10:00:00".parse::<Timestamp>().unwrap(),
            input: 5.0,
            output: 42350.75,
        };
        let entry = HistoryEntry::from(&record);
        assert_eq!(entry.formatted, "Rs. 42,350.75");
        assert_eq!(entry.timestamp, "2025-01-01 10:00:00");
    }

    #[test]
    fn test_parse_predict_request() {
        assert_eq!(parse_predict_request(b"").unwrap().experience, None);
        assert_eq!(parse_predict_request(b" \n").unwrap().experience, None);
        assert_eq!(parse_predict_request(b"{}").unwrap().experience, None);
        assert_eq!(
            parse_predict_request(br#"{"experience": 7.5}"#).unwrap().experience,
            Some(7.5)
        );

        for bad in [
            &br#"{"experience":"twelve"}"#[..],
            &br#"{"experience":12"#[..],
            &br#"{"experiance":12.0}"#[..],
            &b"null"[..],
        ] {
            let (status, Json(body)) = parse_predict_request(bad).unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.code, 400);
        }
    }

    #[test]
    fn test_error_response_from_session_error() {
        let response = ErrorResponse::from(SessionError::NotFound(Uuid::nil()));
        assert_eq!(response.code, 404);
        let (status, _) = api_error(response);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
