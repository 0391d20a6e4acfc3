//! Approval queue: the durable set of knowledge-base promotion candidates
//! derived from a workflow's human-review rows.
//!
//! Derivation is an idempotent upsert keyed by a composite key of workflow
//! id and row content hash. A result set can be saved and re-derived any
//! number of times without duplicating pending items, and a key whose item
//! already reached a terminal status is never resurrected. Approve and
//! reject are batch operations with per-item at-most-once semantics:
//! concurrent decisions on the same item produce exactly one promotion and
//! skip counts for the losers.

pub mod key;
pub mod queue;
pub mod types;

pub use key::composite_key;
pub use queue::{ApprovalQueue, DecisionOutcome};
pub use types::{ApprovalItem, ApprovalStatus};
