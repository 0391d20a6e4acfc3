use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use refindex::IndexError;
use workflow::EngineError;

pub type ApiResult<T> = Result<T, ApiError>;

/// API error surface.
///
/// Batch skip outcomes (already-decided approval items, unknown ids) are
/// not here on purpose: those come back as counts in a 200 response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Workflow not found")]
    NotFound,

    #[error("Workflow results are not ready yet")]
    NotReady,

    #[error("Validation failed for rows {row_indexes:?}: {detail}")]
    ValidationFailed {
        row_indexes: Vec<usize>,
        detail: String,
    },

    #[error("Stale save: expected revision {expected}, stored revision is {actual}")]
    StaleRevision { expected: u64, actual: u64 },

    #[error("Reference index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Workflow processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::NotReady => StatusCode::CONFLICT,
            ApiError::ValidationFailed { .. } | ApiError::StaleRevision { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ProcessingFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::NotReady => "NOT_READY",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::StaleRevision { .. } => "STALE_REVISION",
            ApiError::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            ApiError::ProcessingFailed(_) => "PROCESSING_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let mut detail = json!({
            "code": self.error_code(),
            "message": message,
        });
        if let ApiError::ValidationFailed { row_indexes, .. } = &self {
            detail["row_indexes"] = json!(row_indexes);
        }

        (status, Json(json!({ "error": detail }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound => ApiError::NotFound,
            EngineError::NotReady => ApiError::NotReady,
            EngineError::ItemMasterRequired => ApiError::BadRequest(err.to_string()),
            EngineError::ValidationFailed { row_indexes, detail } => {
                ApiError::ValidationFailed { row_indexes, detail }
            }
            EngineError::StaleRevision { expected, actual } => {
                ApiError::StaleRevision { expected, actual }
            }
            EngineError::ProcessingFailed(detail) => ApiError::ProcessingFailed(detail),
            EngineError::Index(IndexError::Unavailable(detail)) => {
                ApiError::IndexUnavailable(detail)
            }
        }
    }
}

impl From<extract::ExtractError> for ApiError {
    fn from(err: extract::ExtractError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
