//! Reference data for matching: the per-workflow item master and the
//! process-wide knowledge base, plus the bounded candidate query over both.
//!
//! The two halves have very different lifetimes. An [`ItemMasterIndex`] is
//! built from caller-supplied rows when a workflow is created and discarded
//! with it. The [`KnowledgeBase`] lives for the whole process, is shared
//! read-mostly across concurrent workflows, and grows only through approval
//! promotions. [`ReferenceIndex`] stitches the two together behind the
//! [`CandidateSource`] seam the workflow engine matches against.
//!
//! Candidate retrieval is a cheap pre-filter, not the final score: records
//! sharing a normalized part number or at least one material-name token are
//! ranked by token overlap and truncated to top-K. Precise scoring belongs
//! to the matcher.

pub mod kb;
pub mod master;
pub mod query;
pub mod types;

pub use kb::{KbStats, KnowledgeBase};
pub use master::ItemMasterIndex;
pub use query::{CandidateSource, ReferenceIndex, SourceSet};
pub use types::{IndexError, RecordSource, ReferenceRecord};
