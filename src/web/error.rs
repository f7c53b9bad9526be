//! Web error responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Errors surfaced by the web handlers.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Machine-readable error tag used in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            WebError::InvalidUpload(_) => "invalid_upload",
            WebError::NotFound(_) => "not_found",
            WebError::Pipeline(_) => "pipeline_error",
            WebError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            // A stage failure means the upstream model call failed.
            WebError::Pipeline(_) => StatusCode::BAD_GATEWAY,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }))
    }
}
