//! API route handlers, organized by resource:
//!
//! - `health`: liveness probe
//! - `workflows`: upload, status, results read/save, export
//! - `knowledge_base`: listing, pending approvals, approve/reject

pub mod health;
pub mod knowledge_base;
pub mod workflows;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ApiError, ApiResult};

/// Root endpoint: API version and available endpoints.
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "bomrec",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/workflows",
            "/api/v1/workflows/upload",
            "/api/v1/workflows/{id}/status",
            "/api/v1/workflows/{id}/results",
            "/api/v1/workflows/{id}/export",
            "/api/v1/knowledge-base",
            "/api/v1/knowledge-base/pending",
            "/api/v1/knowledge-base/approve",
            "/api/v1/knowledge-base/reject",
            "/health"
        ]
    })))
}

/// Fallback for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
