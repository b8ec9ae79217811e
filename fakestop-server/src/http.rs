//! FAKESTOP web front end
//!
//! Axum server offering the form-based UI plus a small JSON API over the same
//! driver and store the console front end uses.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to an
//! inner function taking plain arguments, so the behaviour is testable without
//! going through the router.
//!
//! Endpoints:
//! - GET  /                  - redirect to /analyze
//! - GET  /analyze           - "new analysis" form
//! - POST /analyze           - run the pipeline on the submitted form
//! - GET  /history           - past analyses, newest first
//! - GET  /history/:id       - one stored analysis
//! - POST /api/analyses      - run the pipeline (JSON)
//! - GET  /api/analyses      - list analyses (JSON)
//! - GET  /api/analyses/:id  - one analysis (JSON)
//! - GET  /health            - database status
//! - GET  /version           - server version info

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::{Form, Json, Router};
use fakestop_core::{AnalysisStore, Analyzer, FakestopError};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::views::{self, View};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub analyzer: Analyzer,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", get(analyze_form_handler).post(analyze_submit_handler))
        .route("/history", get(history_handler))
        .route("/history/:id", get(history_entry_handler))
        .route("/api/analyses", get(list_analyses_handler).post(create_analysis_handler))
        .route("/api/analyses/:id", get(get_analysis_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

/// Start the HTTP server on `addr`.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    analyzer: Analyzer,
    addr: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let state = Arc::new(HttpState { analyzer });

    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("FAKESTOP listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Body of `POST /analyze` (form) and `POST /api/analyses` (JSON).
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeRequest {
    pub noticia: Option<String>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.error, "status": self.status })
    }
}

/// Map a driver/store failure onto an HTTP status.
pub fn error_status(error: &FakestopError) -> StatusCode {
    match error {
        FakestopError::EmptyNews => StatusCode::BAD_REQUEST,
        FakestopError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_json(error: &FakestopError) -> (StatusCode, serde_json::Value) {
    (error_status(error), ErrorResponse::new(error.to_string()).to_value())
}

// ============================================================================
// Inner (directly testable) functions - HTML views
// ============================================================================

/// Validate, run the pipeline and render the outcome.
pub async fn analyze_page_inner(analyzer: &Analyzer, req: AnalyzeRequest) -> (StatusCode, String) {
    let noticia = req.noticia.unwrap_or_default();

    match analyzer.analyze(&noticia).await {
        Ok(record) => (StatusCode::OK, views::analysis_result_page(&record)),
        Err(FakestopError::EmptyNews) => (
            StatusCode::BAD_REQUEST,
            views::analyze_page(Some(views::EMPTY_NEWS_MESSAGE), &noticia),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            (
                error_status(&e),
                views::error_page(View::Analyze, "Não foi possível concluir a análise. Tente novamente."),
            )
        }
    }
}

pub async fn history_page_inner(store: &AnalysisStore) -> (StatusCode, String) {
    match store.list_all().await {
        Ok(records) => (StatusCode::OK, views::history_page(&records)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list analyses");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page(View::History, "Não foi possível carregar o histórico."),
            )
        }
    }
}

pub async fn history_entry_inner(store: &AnalysisStore, id: i64) -> (StatusCode, String) {
    match store.get_record(id).await {
        Ok(Some(record)) => (StatusCode::OK, views::history_entry_page(&record)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            views::error_page(View::History, &FakestopError::NotFound(id).to_string()),
        ),
        Err(e) => {
            tracing::error!(id = id, error = %e, "Failed to load analysis");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page(View::History, "Não foi possível carregar a análise."),
            )
        }
    }
}

// ============================================================================
// Inner (directly testable) functions - JSON API
// ============================================================================

pub async fn health_inner(analyzer: &Analyzer) -> (StatusCode, serde_json::Value) {
    let store = analyzer.store();
    let sqlite_ver = match fakestop_core::db::health_check(store.pool()).await {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                }),
            );
        }
    };

    let analyses = match store.count().await {
        Ok(n) => serde_json::json!(n),
        Err(e) => serde_json::json!(format!("unavailable: {}", e)),
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "sqlite": sqlite_ver,
            "analyses": analyses,
            "model": analyzer.pipeline().model(),
        }),
    )
}

/// Pure, no IO.
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "fakestop",
    })
}

pub async fn create_analysis_inner(
    analyzer: &Analyzer,
    req: AnalyzeRequest,
) -> (StatusCode, serde_json::Value) {
    let noticia = req.noticia.unwrap_or_default();
    let start = Instant::now();

    match analyzer.analyze(&noticia).await {
        Ok(record) => {
            let verdict = record.verdict();
            let mut body = serde_json::json!(record);
            if let Some(obj) = body.as_object_mut() {
                obj.insert("verdict".to_string(), serde_json::json!(verdict));
                obj.insert(
                    "took_ms".to_string(),
                    serde_json::json!(start.elapsed().as_millis() as u64),
                );
            }
            (StatusCode::CREATED, body)
        }
        Err(e) => {
            if !matches!(e, FakestopError::EmptyNews) {
                tracing::error!(error = %e, "Analysis failed");
            }
            error_json(&e)
        }
    }
}

pub async fn list_analyses_inner(store: &AnalysisStore) -> (StatusCode, serde_json::Value) {
    match store.list_all().await {
        Ok(records) => (
            StatusCode::OK,
            serde_json::json!({
                "count": records.len(),
                "analyses": records,
            }),
        ),
        Err(e) => error_json(&FakestopError::Database(e)),
    }
}

pub async fn get_analysis_inner(store: &AnalysisStore, id: i64) -> (StatusCode, serde_json::Value) {
    match store.get_record(id).await {
        Ok(Some(record)) => {
            let verdict = record.verdict();
            let mut body = serde_json::json!(record);
            if let Some(obj) = body.as_object_mut() {
                obj.insert("verdict".to_string(), serde_json::json!(verdict));
            }
            (StatusCode::OK, body)
        }
        Ok(None) => error_json(&FakestopError::NotFound(id)),
        Err(e) => error_json(&FakestopError::Database(e)),
    }
}

// ============================================================================
// Axum handler wrappers (thin - delegate to inner functions)
// ============================================================================

pub async fn index_handler() -> Redirect {
    Redirect::to("/analyze")
}

pub async fn analyze_form_handler() -> Html<String> {
    Html(views::analyze_page(None, ""))
}

pub async fn analyze_submit_handler(
    State(state): State<Arc<HttpState>>,
    Form(req): Form<AnalyzeRequest>,
) -> impl IntoResponse {
    let (status, body) = analyze_page_inner(&state.analyzer, req).await;
    (status, Html(body))
}

pub async fn history_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = history_page_inner(state.analyzer.store()).await;
    (status, Html(body))
}

pub async fn history_entry_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let (status, body) = history_entry_inner(state.analyzer.store(), id).await;
    (status, Html(body))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.analyzer).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn create_analysis_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let (status, body) = create_analysis_inner(&state.analyzer, req).await;
    (status, Json(body))
}

pub async fn list_analyses_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = list_analyses_inner(state.analyzer.store()).await;
    (status, Json(body))
}

pub async fn get_analysis_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let (status, body) = get_analysis_inner(state.analyzer.store(), id).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests - pure helpers; router-level tests live in tests/http_integration.rs
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fakestop_core::LlmError;

    #[test]
    fn test_version_inner_pure() {
        let v = version_inner();
        assert!(v["version"].is_string(), "version must be string");
        assert_eq!(v["service"], "fakestop");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_status(&FakestopError::EmptyNews), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&FakestopError::NotFound(7)), StatusCode::NOT_FOUND);
        assert_eq!(
            error_status(&FakestopError::StageFailed {
                stage: fakestop_core::Stage::Verifier,
                source: LlmError::EmptyResponse,
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&FakestopError::Llm(LlmError::MissingApiKey)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&FakestopError::Database(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_shape() {
        let v = ErrorResponse::new("boom").to_value();
        assert_eq!(v["error"], "boom");
        assert_eq!(v["status"], "error");
    }
}
