use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use rivalscope_core::{JobOutcome, JobState};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{document_with, ApiError, AppState};
use crate::jobs::{ProcessingMethod, SubmitError, Submission, FAILURE_MESSAGE};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    url: Option<String>,
}

/// `POST /analyze`
///
/// Short single urls are analyzed inline and answered with the report.
/// Anything else is accepted for background processing and answered with the
/// job id to poll.
pub(super) async fn submit_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        ApiError::bad_request_with("Invalid request body", rejection.body_text())
    })?;
    let url = body
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let submission = state.orchestrator.submit(url).await.map_err(|err| match err {
        SubmitError::InvalidUrl(reason) => {
            ApiError::bad_request_with("Invalid URL", reason.to_string())
        }
        internal @ SubmitError::Internal { .. } => {
            tracing::error!(request_id = %req_id.0, error = %internal, "analyze: inline job failed");
            ApiError::internal(FAILURE_MESSAGE, internal.to_string())
        }
    })?;

    match submission {
        Submission::Finished {
            job_id,
            state: job_state,
            outcome,
        } => finished(&job_id, job_state, outcome),
        Submission::Accepted {
            job_id,
            website_url,
        } => Ok(Json(json!({
            "analysisId": job_id,
            "status": JobState::Processing,
            "websiteUrl": website_url,
            "processingMethod": ProcessingMethod::Background,
            "message": "Analysis started. Poll /analysis-status with the analysisId for the result.",
        }))
        .into_response()),
    }
}

fn finished(job_id: &str, job_state: JobState, outcome: JobOutcome) -> Result<Response, ApiError> {
    match outcome {
        JobOutcome::Report(doc) => {
            let body = document_with(
                &doc,
                [
                    ("analysisId", Value::from(job_id)),
                    ("status", Value::from(job_state.as_str())),
                    ("processingMethod", json!(ProcessingMethod::Synchronous)),
                ],
            )?;
            Ok(Json(body).into_response())
        }
        JobOutcome::Failure(failure) => Err(ApiError::internal(failure.error, failure.details)),
    }
}
