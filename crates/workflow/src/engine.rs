use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use rayon::prelude::*;
use uuid::Uuid;

use approval::ApprovalQueue;
use classifier::{classify, Decision, MatchResult, Summary, OVERRIDE_REASONING};
use extract::RawLineItem;
use matcher::match_line;
use refindex::{
    CandidateSource, IndexError, ItemMasterIndex, KnowledgeBase, ReferenceIndex, ReferenceRecord,
    SourceSet,
};

use crate::types::{
    ComparisonMode, EngineConfig, EngineError, ExportView, StatusView, Workflow, WorkflowState,
};

/// Inputs held between upload and processing.
struct PendingInputs {
    lines: Vec<RawLineItem>,
    item_master: Option<Vec<RawLineItem>>,
}

/// Orchestrates the per-workflow pipeline and owns the workflow store.
///
/// Workflows process independently; the shared mutable state (knowledge
/// base, approval queue) sits behind its own sharded stores. The workflow
/// map's exclusive entry references serialize `save_results` against
/// concurrent saves and against approval derivation on the same workflow.
pub struct WorkflowEngine {
    cfg: EngineConfig,
    kb: Arc<KnowledgeBase>,
    queue: Arc<ApprovalQueue>,
    workflows: DashMap<Uuid, Workflow>,
    pending: DashMap<Uuid, PendingInputs>,
}

impl WorkflowEngine {
    pub fn new(cfg: EngineConfig, kb: Arc<KnowledgeBase>, queue: Arc<ApprovalQueue>) -> Self {
        Self {
            cfg,
            kb,
            queue,
            workflows: DashMap::new(),
            pending: DashMap::new(),
        }
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn approval_queue(&self) -> &Arc<ApprovalQueue> {
        &self.queue
    }

    /// Register an uploaded document and enter `Processing`.
    ///
    /// Full comparison mode without an item master is rejected up front;
    /// `kb_only` ignores any supplied item master so the mode invariant
    /// (no item-master reference consulted) holds by construction.
    pub fn create(
        &self,
        name: &str,
        mode: ComparisonMode,
        lines: Vec<RawLineItem>,
        item_master: Option<Vec<RawLineItem>>,
    ) -> Result<Uuid, EngineError> {
        if mode == ComparisonMode::Full && item_master.is_none() {
            return Err(EngineError::ItemMasterRequired);
        }
        let item_master = match mode {
            ComparisonMode::Full => item_master,
            ComparisonMode::KbOnly => None,
        };

        let id = Uuid::new_v4();
        let now = Utc::now();
        self.workflows.insert(
            id,
            Workflow {
                id,
                name: name.to_string(),
                comparison_mode: mode,
                state: WorkflowState::Processing,
                results: Vec::new(),
                summary: Summary::default(),
                revision: 0,
                created_at: now,
                updated_at: now,
                error: None,
            },
        );
        self.pending.insert(id, PendingInputs { lines, item_master });
        tracing::info!(workflow_id = %id, name, ?mode, "workflow created");
        Ok(id)
    }

    /// Process the workflow's pending lines against the reference index.
    pub fn run(&self, id: Uuid) -> Result<(), EngineError> {
        let master = self
            .pending
            .get(&id)
            .ok_or(EngineError::NotFound)?
            .item_master
            .as_deref()
            .map(ItemMasterIndex::build);
        let index = ReferenceIndex::new(self.kb.clone(), master);
        self.run_with_source(id, &index)
    }

    /// Processing seam: match the pending lines against an explicit
    /// candidate source. Production goes through [`WorkflowEngine::run`];
    /// tests inject failing sources to exercise the retry budget.
    pub fn run_with_source(
        &self,
        id: Uuid,
        source: &dyn CandidateSource,
    ) -> Result<(), EngineError> {
        let PendingInputs { lines, .. } =
            self.pending.remove(&id).ok_or(EngineError::NotFound)?.1;
        let sources = {
            let wf = self.workflows.get(&id).ok_or(EngineError::NotFound)?;
            wf.comparison_mode.sources()
        };

        // Lines are independent; fan out and keep input order via the
        // indexed collect.
        let outcomes: Vec<Result<MatchResult, IndexError>> = lines
            .par_iter()
            .map(|line| self.process_line(line, source, sources))
            .collect();

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(row) => results.push(row),
                Err(err) => {
                    let detail = err.to_string();
                    self.mark_failed(id, &detail);
                    return Err(EngineError::ProcessingFailed(detail));
                }
            }
        }

        let mut wf = self.workflows.get_mut(&id).ok_or(EngineError::NotFound)?;
        wf.summary = Summary::compute(&results);
        wf.results = results;
        wf.state = WorkflowState::ResultsReady;
        wf.revision += 1;
        wf.updated_at = Utc::now();
        tracing::info!(
            workflow_id = %id,
            total = wf.summary.total,
            human_review = wf.summary.human_review,
            "workflow results ready"
        );
        // Derivation happens while the entry is held, so it cannot race a
        // concurrent save on the same workflow.
        self.queue.derive(id, &wf.results);
        Ok(())
    }

    fn process_line(
        &self,
        line: &RawLineItem,
        source: &dyn CandidateSource,
        sources: SourceSet,
    ) -> Result<MatchResult, IndexError> {
        let candidates = self.query_with_retry(line, source, sources)?;
        let candidate = match_line(line, &candidates, &self.cfg.matching);
        let decision = classify(&candidate, &self.cfg.classification);
        Ok(MatchResult::from_decision(line, &decision))
    }

    fn query_with_retry(
        &self,
        line: &RawLineItem,
        source: &dyn CandidateSource,
        sources: SourceSet,
    ) -> Result<Vec<ReferenceRecord>, IndexError> {
        let attempts = self.cfg.index_retries.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match source.candidates(line, sources, self.cfg.matching.top_k) {
                Ok(records) => return Ok(records),
                Err(err) => {
                    tracing::warn!(attempt, attempts, %err, "reference index query failed");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| IndexError::Unavailable("no attempt made".into())))
    }

    fn mark_failed(&self, id: Uuid, detail: &str) {
        if let Some(mut wf) = self.workflows.get_mut(&id) {
            wf.state = WorkflowState::Failed;
            wf.error = Some(detail.to_string());
            wf.updated_at = Utc::now();
            tracing::error!(workflow_id = %id, detail, "workflow marked failed");
        }
    }

    pub fn get_status(&self, id: Uuid) -> Result<StatusView, EngineError> {
        let wf = self.workflows.get(&id).ok_or(EngineError::NotFound)?;
        Ok(status_view(&wf))
    }

    /// Current results. `NotReady` while processing is distinguishable from
    /// `NotFound`; a failed workflow reports its failure detail.
    pub fn get_results(&self, id: Uuid) -> Result<Workflow, EngineError> {
        let wf = self.workflows.get(&id).ok_or(EngineError::NotFound)?;
        match wf.state {
            WorkflowState::Processing => Err(EngineError::NotReady),
            WorkflowState::Failed => Err(EngineError::ProcessingFailed(
                wf.error.clone().unwrap_or_else(|| "unknown failure".into()),
            )),
            WorkflowState::ResultsReady => Ok(wf.clone()),
        }
    }

    /// Replace the stored result set with the caller's edited rows.
    ///
    /// Caller-authoritative: no re-matching. All-or-nothing: every row must
    /// carry a material name and a part number, otherwise nothing is
    /// applied and the offending row indexes are reported. Rows flagged
    /// `is_new` keep the caller-override action and reasoning verbatim no
    /// matter what the payload said. Returns the new revision.
    pub fn save_results(
        &self,
        id: Uuid,
        mut rows: Vec<MatchResult>,
        expected_revision: Option<u64>,
    ) -> Result<u64, EngineError> {
        let mut wf = self.workflows.get_mut(&id).ok_or(EngineError::NotFound)?;
        if wf.state == WorkflowState::Processing {
            return Err(EngineError::NotReady);
        }
        if let Some(expected) = expected_revision {
            if expected != wf.revision {
                return Err(EngineError::StaleRevision {
                    expected,
                    actual: wf.revision,
                });
            }
        }

        let offending: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.material_name.trim().is_empty() || row.part_number.trim().is_empty()
            })
            .map(|(i, _)| i)
            .collect();
        if !offending.is_empty() {
            return Err(EngineError::ValidationFailed {
                row_indexes: offending,
                detail: "material_name and part_number are mandatory".into(),
            });
        }

        for row in &mut rows {
            if row.is_new {
                row.action_path = Decision::CallerOverride.action();
                row.reasoning = OVERRIDE_REASONING.to_string();
            }
        }

        wf.summary = Summary::compute(&rows);
        wf.results = rows;
        wf.state = WorkflowState::ResultsReady;
        wf.revision += 1;
        wf.updated_at = Utc::now();
        let revision = wf.revision;
        tracing::info!(workflow_id = %id, revision, "workflow results saved");
        self.queue.derive(id, &wf.results);
        Ok(revision)
    }

    /// Read-only export of the current results. Mutates nothing.
    pub fn export(&self, id: Uuid) -> Result<ExportView, EngineError> {
        let wf = self.get_results(id)?;
        Ok(ExportView {
            workflow_id: wf.id,
            name: wf.name,
            summary: wf.summary,
            results: wf.results,
            export_timestamp: Utc::now(),
        })
    }

    /// All workflows, newest first.
    pub fn list(&self) -> Vec<StatusView> {
        let mut views: Vec<StatusView> = self.workflows.iter().map(|wf| status_view(&wf)).collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.workflow_id.cmp(&b.workflow_id)));
        views
    }
}

fn status_view(wf: &Workflow) -> StatusView {
    StatusView {
        workflow_id: wf.id,
        name: wf.name.clone(),
        comparison_mode: wf.comparison_mode,
        state: wf.state,
        summary: wf.summary,
        revision: wf.revision,
        created_at: wf.created_at,
        updated_at: wf.updated_at,
        error: wf.error.clone(),
    }
}
