use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use classifier::{ActionPath, MatchResult};
use refindex::KnowledgeBase;

use crate::key::composite_key;
use crate::types::{ApprovalItem, ApprovalStatus};

/// Result of a batch approve/reject call.
///
/// Unknown ids and items already in a terminal state are skips, not errors;
/// a retried request reports skips instead of double-applying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    pub applied: usize,
    pub skipped: usize,
}

/// The approval store shared by all workflows.
///
/// Both maps are sharded by key (dashmap), so derivation and decisions for
/// unrelated items never contend. Transitions go through the exclusive
/// per-entry reference, which is what makes a decision at-most-once under
/// concurrent duplicate requests.
pub struct ApprovalQueue {
    kb: Arc<KnowledgeBase>,
    items: DashMap<u64, ApprovalItem>,
    by_key: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl ApprovalQueue {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            items: DashMap::new(),
            by_key: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Idempotent upsert of approval items for the given result set.
    ///
    /// For every `human_review` row: an existing pending item for the same
    /// composite key is left untouched, a terminal item is never
    /// resurrected, and only genuinely new keys create a pending item
    /// snapshotting the row's current fields. Returns ids of the items
    /// created by this call.
    pub fn derive(&self, workflow_id: Uuid, results: &[MatchResult]) -> Vec<u64> {
        let mut created = Vec::new();
        for row in results {
            if row.action_path != ActionPath::HumanReview {
                continue;
            }
            let key = composite_key(workflow_id, row);
            match self.by_key.entry(key.clone()) {
                Entry::Occupied(_) => {
                    // Pending or terminal: either way, nothing to do.
                }
                Entry::Vacant(slot) => {
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    let item = ApprovalItem {
                        id,
                        workflow_id,
                        key,
                        fields: row.as_line(),
                        status: ApprovalStatus::Pending,
                        created_at: Utc::now(),
                        decided_at: None,
                    };
                    self.items.insert(id, item);
                    slot.insert(id);
                    created.push(id);
                }
            }
        }
        if !created.is_empty() {
            tracing::debug!(
                workflow_id = %workflow_id,
                created = created.len(),
                "derived approval items"
            );
        }
        created
    }

    /// Pending items, optionally filtered to one workflow, ordered by id.
    pub fn list_pending(&self, workflow_id: Option<Uuid>) -> Vec<ApprovalItem> {
        let mut pending: Vec<ApprovalItem> = self
            .items
            .iter()
            .filter(|item| item.status == ApprovalStatus::Pending)
            .filter(|item| workflow_id.map_or(true, |wf| item.workflow_id == wf))
            .map(|item| item.value().clone())
            .collect();
        pending.sort_by_key(|item| item.id);
        pending
    }

    pub fn get(&self, id: u64) -> Option<ApprovalItem> {
        self.items.get(&id).map(|item| item.value().clone())
    }

    /// Approve a batch. Each applied item appends its snapshot to the
    /// knowledge base exactly once; the insert happens while the entry is
    /// exclusively held, so a racing duplicate observes the terminal status
    /// and counts as a skip.
    pub fn approve(&self, ids: &[u64]) -> DecisionOutcome {
        self.decide(ids, ApprovalStatus::Approved)
    }

    /// Reject a batch. Updates status only; nothing reaches the knowledge
    /// base and the originating rows keep their action path.
    pub fn reject(&self, ids: &[u64]) -> DecisionOutcome {
        self.decide(ids, ApprovalStatus::Rejected)
    }

    fn decide(&self, ids: &[u64], target: ApprovalStatus) -> DecisionOutcome {
        debug_assert!(target.is_terminal());
        let mut outcome = DecisionOutcome::default();
        for id in ids {
            match self.items.get_mut(id) {
                Some(mut item) if item.status == ApprovalStatus::Pending => {
                    item.status = target;
                    item.decided_at = Some(Utc::now());
                    if target == ApprovalStatus::Approved {
                        self.kb.insert(&item.fields);
                    }
                    outcome.applied += 1;
                }
                Some(_) | None => {
                    outcome.skipped += 1;
                }
            }
        }
        tracing::info!(
            ?target,
            applied = outcome.applied,
            skipped = outcome.skipped,
            "approval batch decided"
        );
        outcome
    }
}
