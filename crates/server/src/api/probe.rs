//! Probe API handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use super::handlers::ErrorResponse;
use crate::state::ProbeState;

/// Response for a successful probe
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    /// Stdout of `ffmpeg -version`
    pub output: String,
}

pub async fn root() -> &'static str {
    "FFmpeg probe service"
}

/// Run `ffmpeg -version` and return what it printed
pub async fn process(
    State(state): State<Arc<ProbeState>>,
) -> Result<Json<ProbeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let args = ["-version".to_string()];

    match state.runner().run(&args).await {
        Ok(output) => Ok(Json(ProbeResponse {
            output: output.stdout,
        })),
        Err(e) => {
            error!(error = %e, stderr = e.stderr().unwrap_or_default(), "ffmpeg probe failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("ffmpeg failed")),
            ))
        }
    }
}
