//! Workflow engine: the orchestration layer of the reconciliation core.
//!
//! A workflow is created from an uploaded document's line rows, fans them
//! through matching and classification in parallel, reassembles the results
//! in input order, and then holds the editable result set. Saving edits is
//! caller-authoritative (no re-matching), all-or-nothing, and serialized
//! per workflow with a revision check so a stale save is rejected instead
//! of clobbering a concurrent one. Reaching `results_ready` and every
//! subsequent save derive approval items for the rows currently classified
//! `human_review`.

pub mod engine;
pub mod types;

pub use engine::WorkflowEngine;
pub use types::{
    ComparisonMode, EngineConfig, EngineError, ExportView, StatusView, Workflow, WorkflowState,
};
