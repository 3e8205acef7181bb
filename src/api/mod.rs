//! Axum handlers. Each one validates input, calls into the library, and
//! maps [`RagError`] onto an HTTP status with a `{"error": ...}` body.

pub mod code;
pub mod rag;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::RagError;

pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

impl From<RagError> for (StatusCode, Json<Value>) {
    fn from(err: RagError) -> Self {
        let status = match &err {
            RagError::Validation(_) | RagError::PathSecurity => StatusCode::BAD_REQUEST,
            RagError::NotFound(_) | RagError::SourceUnavailable { .. } => StatusCode::NOT_FOUND,
            RagError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RagError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {err}");
            return error_body(status, "Internal server error");
        }
        error_body(status, err.to_string())
    }
}
