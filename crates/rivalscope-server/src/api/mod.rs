mod analyze;
mod status;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rivalscope_core::{AppConfig, CompetitorAnalysis};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::jobs::Orchestrator;
use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<AppConfig>,
}

/// Error responses. Bodies follow the dashboard's contract: `{error, details}`
/// for failures and `{status, message}` for unknown jobs.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        error: String,
        details: Option<String>,
    },
    NotFound {
        message: String,
    },
    Internal {
        error: String,
        details: String,
    },
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Internal {
            error: error.into(),
            details: details.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { error, details } => {
                let body = match details {
                    Some(details) => json!({ "error": error, "details": details }),
                    None => json!({ "error": error }),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "status": "not_found", "message": message })),
            )
                .into_response(),
            ApiError::Internal { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error, "details": details })),
            )
                .into_response(),
        }
    }
}

/// Serializes `doc` as a JSON object and appends `fields`.
fn document_with<const N: usize>(
    doc: &CompetitorAnalysis,
    fields: [(&str, Value); N],
) -> Result<Value, ApiError> {
    let mut body = serde_json::to_value(doc)
        .map_err(|e| ApiError::internal("Failed to serialize analysis", e.to_string()))?;
    if let Value::Object(map) = &mut body {
        for (key, value) in fields {
            map.insert(key.to_string(), value);
        }
    }
    Ok(body)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    model: &'static str,
    jobs: usize,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze::submit_analysis))
        .route("/analysis-status", get(status::get_analysis_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let model = if state.config.has_model_api_key() {
        "configured"
    } else {
        "missing_api_key"
    };
    Json(HealthData {
        status: "ok",
        model,
        jobs: state.orchestrator.store().len().await,
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
