//! Merge API handler.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use reelmerge_core::{PipelineError, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Body of a 500 answer; failure detail stays in the server log.
pub const MERGE_FAILED: &str = "merge failed";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a completed merge
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResponse {
    /// Signed GET URL of the merged object
    pub url: String,
    pub output_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Merge endpoint errors
#[derive(Debug)]
pub enum MergeApiError {
    /// The request body is unusable; the message is returned as is.
    BadRequest(String),
    /// Anything that failed after validation.
    Internal,
}

impl From<ValidationError> for MergeApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<PipelineError> for MergeApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => e.into(),
            _ => Self::Internal,
        }
    }
}

impl IntoResponse for MergeApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(MERGE_FAILED)),
            )
                .into_response(),
        }
    }
}

// ============================================================================
// Body parsing
// ============================================================================

/// Raw request fields pulled out of a JSON body.
#[derive(Debug, PartialEq, Eq)]
pub struct MergeBody {
    pub sources: Vec<String>,
    pub output_name: Option<String>,
}

/// Parses `{ "sources": [...], "outputName"?: "..." }`.
///
/// A missing or non-list `sources` is reported the same way as an empty one.
/// A null `outputName` counts as absent.
pub fn parse_merge_body(body: &[u8]) -> Result<MergeBody, MergeApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| MergeApiError::BadRequest("Request body must be a JSON object".to_string()))?;

    let sources = match value.get("sources") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ValidationError::InvalidSource {
                    index,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(ValidationError::NoSources.into()),
    };

    let output_name = match value.get("outputName") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(MergeApiError::BadRequest(
                "outputName must be a string".to_string(),
            ))
        }
    };

    Ok(MergeBody {
        sources,
        output_name,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Merge the sources into one file and return a signed URL for it
pub async fn merge(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MergeResponse>, MergeApiError> {
    let body = parse_merge_body(&body)?;

    let outcome = state
        .pipeline()
        .handle(body.sources, body.output_name)
        .await?;

    Ok(Json(MergeResponse {
        url: outcome.url,
        output_name: outcome.output_name,
        expires_at: outcome.expires_at,
    }))
}
