use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use classifier::{ClassifierConfig, MatchResult, Summary};
use matcher::MatchConfig;
use refindex::{IndexError, SourceSet};

/// Which reference datasets a workflow reconciles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Item master and knowledge base.
    Full,
    /// Knowledge base only; no item master is consulted for any row.
    KbOnly,
}

impl ComparisonMode {
    pub fn sources(self) -> SourceSet {
        match self {
            ComparisonMode::Full => SourceSet::all(),
            ComparisonMode::KbOnly => SourceSet::kb_only(),
        }
    }
}

/// Lifecycle of a workflow. Upload enters `Processing` immediately; a
/// workflow that exhausts its index retries lands in `Failed` rather than
/// staying ambiguously in `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Processing,
    ResultsReady,
    Failed,
}

/// One reconciliation workflow and its editable result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    pub comparison_mode: ComparisonMode,
    pub state: WorkflowState,
    pub results: Vec<MatchResult>,
    /// Recomputed from `results` on every change, never mutated directly.
    pub summary: Summary,
    /// Bumped on every stored mutation; stale saves are detected against it.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Failure detail when `state == Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lightweight listing/status view of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub workflow_id: Uuid,
    pub name: String,
    pub comparison_mode: ComparisonMode,
    pub state: WorkflowState,
    pub summary: Summary,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read-only export of a workflow's current results. Producing one mutates
/// nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportView {
    pub workflow_id: Uuid,
    pub name: String,
    pub summary: Summary,
    pub results: Vec<MatchResult>,
    pub export_timestamp: DateTime<Utc>,
}

/// Engine-wide configuration: stage configs plus the retry budget for
/// transient reference-index failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub classification: ClassifierConfig,
    #[serde(default = "EngineConfig::default_index_retries")]
    pub index_retries: u32,
}

impl EngineConfig {
    pub(crate) fn default_index_retries() -> u32 {
        3
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            classification: ClassifierConfig::default(),
            index_retries: Self::default_index_retries(),
        }
    }
}

/// Errors surfaced by the workflow engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown workflow id. Not retryable.
    #[error("workflow not found")]
    NotFound,
    /// Workflow is still processing; the caller should poll.
    #[error("workflow results are not ready yet")]
    NotReady,
    /// Processing gave up after exhausting index retries.
    #[error("workflow processing failed: {0}")]
    ProcessingFailed(String),
    /// Edited result set violates the mandatory-field invariant. Nothing
    /// was applied; the offending row indexes are listed.
    #[error("validation failed for rows {row_indexes:?}: {detail}")]
    ValidationFailed {
        row_indexes: Vec<usize>,
        detail: String,
    },
    /// Save carried a revision that no longer matches the stored workflow.
    #[error("stale save: expected revision {expected}, stored revision is {actual}")]
    StaleRevision { expected: u64, actual: u64 },
    /// Full comparison mode requires an item master.
    #[error("item master is required for full comparison mode")]
    ItemMasterRequired,
    /// Reference data unreachable.
    #[error(transparent)]
    Index(#[from] IndexError),
}
