use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Knowledge base items with statistics, optionally filtered by search text.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let items = state.kb.search(&query.search, query.limit);
    let stats = state.kb.stats();
    Ok(Json(json!({ "success": true, "items": items, "stats": stats })))
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    #[serde(default)]
    pub workflow_id: Option<Uuid>,
}

/// Pending approval items, optionally filtered to one workflow.
pub async fn pending(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> ApiResult<impl IntoResponse> {
    let pending_items = state.queue.list_pending(query.workflow_id);
    Ok(Json(json!({ "success": true, "pending_items": pending_items })))
}

/// Batch decision request. `workflow_id` is informational (logging only);
/// the item ids are globally unique.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub workflow_id: Option<Uuid>,
    pub item_ids: Vec<u64>,
}

/// Approve a batch of pending items, promoting each into the knowledge base
/// exactly once. Already-decided and unknown ids come back as skips.
pub async fn approve(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(
        workflow_id = ?request.workflow_id,
        items = request.item_ids.len(),
        "approval request received"
    );
    let outcome = state.queue.approve(&request.item_ids);
    Ok(Json(json!({
        "success": true,
        "approved_count": outcome.applied,
        "skipped_count": outcome.skipped,
    })))
}

/// Reject a batch of pending items. Status-only; nothing reaches the
/// knowledge base.
pub async fn reject(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(
        workflow_id = ?request.workflow_id,
        items = request.item_ids.len(),
        "rejection request received"
    );
    let outcome = state.queue.reject(&request.item_ids);
    Ok(Json(json!({
        "success": true,
        "rejected_count": outcome.applied,
        "skipped_count": outcome.skipped,
    })))
}
