use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use classifier::MatchResult;
use extract::{ExtractionAdapter, JsonRowsAdapter, RawLineItem};
use workflow::ComparisonMode;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Upload request: extracted document rows plus workflow metadata.
///
/// `document_rows` is the raw extraction payload and goes through the
/// extraction adapter; `item_master_rows` is already row-shaped because the
/// item master is caller-curated reference data, not a parsed document.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub workflow_name: String,
    pub comparison_mode: ComparisonMode,
    pub document_rows: serde_json::Value,
    #[serde(default)]
    pub item_master_rows: Option<Vec<RawLineItem>>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub workflow_id: Uuid,
}

/// Register a workflow and start processing in the background.
pub async fn upload(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.workflow_name.trim().is_empty() {
        return Err(ApiError::BadRequest("workflow_name must not be empty".into()));
    }

    let payload = serde_json::to_vec(&request.document_rows)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let lines = JsonRowsAdapter.extract(&payload)?;

    let id = state.engine.create(
        &request.workflow_name,
        request.comparison_mode,
        lines,
        request.item_master_rows,
    )?;

    // Matching is CPU-bound; keep it off the async workers.
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(err) = engine.run(id) {
            tracing::error!(workflow_id = %id, %err, "workflow processing failed");
        }
    });

    Ok(Json(UploadResponse {
        success: true,
        workflow_id: id,
    }))
}

/// List all workflows, newest first.
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let workflows = state.engine.list();
    Ok(Json(json!({ "success": true, "workflows": workflows })))
}

/// Workflow status, distinguishing processing, ready, and failed.
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.engine.get_status(id)?;
    Ok(Json(json!({ "success": true, "workflow": view })))
}

/// Current results with summary counters.
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let wf = state.engine.get_results(id)?;
    Ok(Json(json!({
        "success": true,
        "workflow_id": wf.id,
        "state": wf.state,
        "summary": wf.summary,
        "matches": wf.results,
        "revision": wf.revision,
    })))
}

/// Save request: the full edited result set, replace-wholesale.
#[derive(Debug, Deserialize)]
pub struct SaveResultsRequest {
    pub matches: Vec<MatchResult>,
    /// Revision the caller edited from; a mismatch rejects the save.
    #[serde(default)]
    pub revision: Option<u64>,
}

/// Replace the stored result set with the caller's edits.
pub async fn save_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveResultsRequest>,
) -> ApiResult<impl IntoResponse> {
    let revision = state
        .engine
        .save_results(id, request.matches, request.revision)?;
    Ok(Json(json!({ "success": true, "revision": revision })))
}

/// Read-only export of the current results.
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.engine.export(id)?;
    Ok(Json(json!({ "success": true, "export": view })))
}
