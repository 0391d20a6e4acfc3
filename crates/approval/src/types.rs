use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use extract::RawLineItem;

/// Lifecycle of an approval item. Terminal states are permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::Rejected)
    }
}

/// One knowledge-base promotion candidate awaiting a human decision.
///
/// The fields are a snapshot taken at derivation time; later edits to the
/// originating row mint a new key and a new item rather than mutating this
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalItem {
    pub id: u64,
    pub workflow_id: Uuid,
    /// Composite key of workflow id and normalized row content.
    pub key: String,
    pub fields: RawLineItem,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}
