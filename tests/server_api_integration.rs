//! HTTP API integration tests driven through the router with in-memory
//! requests, no bound socket.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{build_router, AppState, ServerConfig};

fn app() -> Router {
    build_router(AppState::new(ServerConfig::default()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn upload_payload(rows: Value) -> Value {
    json!({
        "workflow_name": "wi-batch",
        "comparison_mode": "kb_only",
        "document_rows": rows,
    })
}

/// Processing runs on a background blocking task; poll status until the
/// workflow leaves `processing`.
async fn wait_until_done(app: &Router, workflow_id: &str) -> Value {
    for _ in 0..200 {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/status")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        if body["workflow"]["state"] != "processing" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("workflow {workflow_id} still processing after polling budget");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["knowledge_base_records"], 0);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = app().oneshot(get("/api/v1/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_rejects_an_empty_workflow_name() {
    let payload = json!({
        "workflow_name": "  ",
        "comparison_mode": "kb_only",
        "document_rows": [],
    });
    let response = app()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn upload_rejects_full_mode_without_an_item_master() {
    let payload = json!({
        "workflow_name": "wi-batch",
        "comparison_mode": "full",
        "document_rows": [{"material_name": "O-Ring", "part_number": "PN-100"}],
    });
    let response = app()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn results_for_an_unknown_workflow_are_not_found() {
    let response = app()
        .oneshot(get("/api/v1/workflows/00000000-0000-0000-0000-000000000000/results"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn upload_process_review_approve_flow() {
    let app = app();

    // Upload two rows: one destined for review, one non-material reject.
    let payload = upload_payload(json!([
        {"material_name": "Sealant X", "part_number": "SX-9", "item_type": "Consumable"},
        {"qc_process_or_wi_step": "Step 10: torque check"},
    ]));
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let workflow_id = body["workflow_id"].as_str().unwrap().to_string();

    let status = wait_until_done(&app, &workflow_id).await;
    assert_eq!(status["workflow"]["state"], "results_ready");

    // Results: one review row, one reject.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/results")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["human_review"], 1);
    assert_eq!(body["summary"]["reject"], 1);
    assert_eq!(body["matches"][0]["action_path"], "human_review");

    // The review row surfaced as a pending approval item.
    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/v1/knowledge-base/pending?workflow_id={workflow_id}"
        )))
        .await
        .unwrap();
    let body = body_json(response).await;
    let pending = body["pending_items"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["fields"]["material_name"], "Sealant X");
    let item_id = pending[0]["id"].as_u64().unwrap();

    // Approve it; the knowledge base gains the record.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/knowledge-base/approve",
            &json!({"workflow_id": workflow_id, "item_ids": [item_id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["approved_count"], 1);
    assert_eq!(body["skipped_count"], 0);

    let response = app
        .clone()
        .oneshot(get("/api/v1/knowledge-base?search=sealant&limit=10"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"][0]["material_name"], "Sealant X");
    assert_eq!(body["stats"]["total_records"], 1);

    // Re-approving the same item is a skip, not a second insertion.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/knowledge-base/approve",
            &json!({"item_ids": [item_id]}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["approved_count"], 0);
    assert_eq!(body["skipped_count"], 1);
}

#[tokio::test]
async fn save_results_validates_rows_and_reports_indexes() {
    let app = app();
    let payload = upload_payload(json!([
        {"material_name": "O-Ring", "part_number": "PN-100", "item_type": "Consumable"},
    ]));
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    let workflow_id = body_json(response).await["workflow_id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_until_done(&app, &workflow_id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/results")))
        .await
        .unwrap();
    let body = body_json(response).await;
    let mut matches = body["matches"].clone();
    matches[0]["part_number"] = json!("");

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/workflows/{workflow_id}/results"),
            &json!({"matches": matches}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["row_indexes"], json!([0]));
}

#[tokio::test]
async fn stale_save_is_rejected_with_the_stored_revision() {
    let app = app();
    let payload = upload_payload(json!([
        {"material_name": "O-Ring", "part_number": "PN-100", "item_type": "Consumable"},
    ]));
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    let workflow_id = body_json(response).await["workflow_id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_until_done(&app, &workflow_id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/results")))
        .await
        .unwrap();
    let body = body_json(response).await;
    let matches = body["matches"].clone();
    let revision = body["revision"].as_u64().unwrap();

    // First save from the current revision wins.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/workflows/{workflow_id}/results"),
            &json!({"matches": matches, "revision": revision}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let new_revision = body_json(response).await["revision"].as_u64().unwrap();
    assert_eq!(new_revision, revision + 1);

    // A second save from the same stale revision is rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/workflows/{workflow_id}/results"),
            &json!({"matches": body["matches"], "revision": revision}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "STALE_REVISION");
}

#[tokio::test]
async fn caller_added_rows_are_forced_to_the_override_path() {
    let app = app();
    let payload = upload_payload(json!([
        {"material_name": "O-Ring", "part_number": "PN-100", "item_type": "Consumable"},
    ]));
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/workflows/upload", &payload))
        .await
        .unwrap();
    let workflow_id = body_json(response).await["workflow_id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_until_done(&app, &workflow_id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/results")))
        .await
        .unwrap();
    let mut matches = body_json(response).await["matches"].clone();
    matches.as_array_mut().unwrap().push(json!({
        "material_name": "Manual Row",
        "part_number": "M-1",
        "action_path": "reject",
        "reasoning": "client scribbles",
        "is_new": true,
    }));

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/workflows/{workflow_id}/results"),
            &json!({"matches": matches}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/results")))
        .await
        .unwrap();
    let body = body_json(response).await;
    let manual = body["matches"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(manual["action_path"], "auto_register");
    assert_eq!(manual["reasoning"], "manually added and pre-approved");

    // Export reflects the saved set without mutating it.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/workflows/{workflow_id}/export")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["export"]["summary"]["total"], 2);
}
