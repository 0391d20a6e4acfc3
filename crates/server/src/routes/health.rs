use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiResult;
use crate::state::AppState;

/// Liveness probe with a couple of cheap store counters.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "status": "healthy",
        "knowledge_base_records": state.kb.len(),
        "workflows": state.engine.list().len(),
    })))
}
