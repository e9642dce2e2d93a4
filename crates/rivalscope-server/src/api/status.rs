use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use rivalscope_core::{JobOutcome, JobState};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{document_with, ApiError, AppState};

const NOT_FOUND_MESSAGE: &str = "Analysis not found. It may have expired or never existed.";
const PROCESSING_MESSAGE: &str = "Analysis is still in progress. Please check again in a few seconds.";

#[derive(Debug, Deserialize)]
pub(super) struct StatusQuery {
    id: Option<String>,
    debug: Option<String>,
}

impl StatusQuery {
    fn wants_debug(&self) -> bool {
        self.debug
            .as_deref()
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
    }
}

/// `GET /analysis-status?id=...`
///
/// `debug=true` lists every stored job instead, when diagnostic endpoints are
/// enabled; otherwise the flag is ignored.
pub(super) async fn get_analysis_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ApiError> {
    if query.wants_debug() && state.config.debug_endpoints {
        let entries = state.orchestrator.store().snapshot().await;
        return Ok(Json(json!({
            "cacheSize": entries.len(),
            "cacheEntries": entries,
        }))
        .into_response());
    }

    let id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Analysis ID is required"))?;

    let job = state
        .orchestrator
        .status(id)
        .await
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

    match (job.state, job.result) {
        (JobState::Processing, _) => Ok(Json(json!({
            "status": JobState::Processing,
            "message": PROCESSING_MESSAGE,
        }))
        .into_response()),
        (job_state, Some(JobOutcome::Report(doc))) => {
            let body = document_with(
                &doc,
                [
                    ("analysisId", Value::from(job.id)),
                    ("status", Value::from(job_state.as_str())),
                ],
            )?;
            Ok(Json(body).into_response())
        }
        (_, Some(JobOutcome::Failure(failure))) => {
            Err(ApiError::internal(failure.error, failure.details))
        }
        (job_state, None) => {
            tracing::error!(job_id = %job.id, %job_state, "status: terminal job has no result");
            Err(ApiError::internal(
                crate::jobs::FAILURE_MESSAGE,
                "analysis finished without a result",
            ))
        }
    }
}
