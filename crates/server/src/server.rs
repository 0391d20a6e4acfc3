//! Server initialization and routing: router construction, middleware
//! stack, and graceful shutdown.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::routes::{api_info, health, knowledge_base, not_found, workflows};
use crate::state::AppState;

/// Build the axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route("/api/v1/workflows", get(workflows::list))
        .route("/api/v1/workflows/upload", post(workflows::upload))
        .route("/api/v1/workflows/{id}/status", get(workflows::status))
        .route(
            "/api/v1/workflows/{id}/results",
            get(workflows::get_results).post(workflows::save_results),
        )
        .route("/api/v1/workflows/{id}/export", get(workflows::export))
        .route("/api/v1/knowledge-base", get(knowledge_base::list))
        .route("/api/v1/knowledge-base/pending", get(knowledge_base::pending))
        .route("/api/v1/knowledge-base/approve", post(knowledge_base::approve))
        .route("/api/v1/knowledge-base/reject", post(knowledge_base::reject));

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let state = AppState::new(config);
    let router = build_router(state);

    tracing::info!(%addr, "bomrec server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("bomrec server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
