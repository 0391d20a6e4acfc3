//! Workspace umbrella crate for the BOM reconciliation core.
//!
//! Stitches the stage crates together so callers can run the
//! match-and-classify pipeline over extracted line items with a single API
//! entry point, and re-exports the types each stage owns.

pub use approval::{
    composite_key, ApprovalItem, ApprovalQueue, ApprovalStatus, DecisionOutcome,
};
pub use classifier::{
    classify, ActionPath, ClassifierConfig, Decision, MatchResult, Summary, OVERRIDE_REASONING,
};
pub use extract::{
    name_tokens, normalize_part_number, normalize_text, ExtractError, ExtractionAdapter,
    ItemType, JsonRowsAdapter, RawLineItem,
};
pub use matcher::{match_line, MatchCandidate, MatchConfig, ScoredReference};
pub use refindex::{
    CandidateSource, IndexError, ItemMasterIndex, KbStats, KnowledgeBase, RecordSource,
    ReferenceIndex, ReferenceRecord, SourceSet,
};
pub use workflow::{
    ComparisonMode, EngineConfig, EngineError, ExportView, StatusView, Workflow, WorkflowEngine,
    WorkflowState,
};

/// Match and classify a sequence of lines against a candidate source.
///
/// One row out per row in, input order preserved. This is the sequential
/// convenience path; the workflow engine runs the same stages with
/// per-line fan-out and state management on top.
pub fn process_lines(
    lines: &[RawLineItem],
    source: &dyn CandidateSource,
    sources: SourceSet,
    match_cfg: &MatchConfig,
    classifier_cfg: &ClassifierConfig,
) -> Result<Vec<MatchResult>, IndexError> {
    lines
        .iter()
        .map(|line| {
            let candidates = source.candidates(line, sources, match_cfg.top_k)?;
            let candidate = match_line(line, &candidates, match_cfg);
            let decision = classify(&candidate, classifier_cfg);
            Ok(MatchResult::from_decision(line, &decision))
        })
        .collect()
}
