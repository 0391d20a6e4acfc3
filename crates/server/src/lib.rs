//! HTTP REST API for the BOM reconciliation core.
//!
//! Exposes the reconciliation workflow over axum:
//!
//! - **Upload**: register a document's extracted rows and start processing
//! - **Results**: poll status, read results, save caller edits, export
//! - **Knowledge base**: listing with search and stats
//! - **Approvals**: pending queue, batch approve/reject
//!
//! Public endpoints: `GET /` (api info) and `GET /health`. Everything else
//! lives under `/api/v1`. Errors come back as a `{error: {code, message}}`
//! envelope with the status mapping described in [`error::ApiError`].

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use server::{build_router, start_server};
pub use state::AppState;
