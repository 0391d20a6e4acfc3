use std::sync::Arc;

use serde::{Deserialize, Serialize};

use extract::{name_tokens, RawLineItem};

use crate::kb::KnowledgeBase;
use crate::master::ItemMasterIndex;
use crate::types::{IndexError, RecordSource, ReferenceRecord};

/// Which reference datasets a query may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub item_master: bool,
    pub knowledge_base: bool,
}

impl SourceSet {
    pub fn all() -> Self {
        Self {
            item_master: true,
            knowledge_base: true,
        }
    }

    pub fn kb_only() -> Self {
        Self {
            item_master: false,
            knowledge_base: true,
        }
    }

    pub fn allows(&self, source: RecordSource) -> bool {
        match source {
            RecordSource::ItemMaster => self.item_master,
            RecordSource::KnowledgeBase => self.knowledge_base,
        }
    }
}

/// Seam the workflow engine matches against.
///
/// The production implementation is [`ReferenceIndex`]; tests substitute
/// failing or canned sources to exercise retry and failure paths.
pub trait CandidateSource: Send + Sync {
    /// Bounded candidate set for one line, cheapest-filter-first.
    fn candidates(
        &self,
        line: &RawLineItem,
        sources: SourceSet,
        top_k: usize,
    ) -> Result<Vec<ReferenceRecord>, IndexError>;
}

/// Combined view over the item master half and the knowledge base half.
pub struct ReferenceIndex {
    kb: Arc<KnowledgeBase>,
    master: Option<ItemMasterIndex>,
}

impl ReferenceIndex {
    pub fn new(kb: Arc<KnowledgeBase>, master: Option<ItemMasterIndex>) -> Self {
        Self { kb, master }
    }

    pub fn has_item_master(&self) -> bool {
        self.master.is_some()
    }
}

/// Token-overlap ratio between the query tokens and a record's name tokens.
fn overlap_ratio(query_tokens: &[String], record: &ReferenceRecord) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let record_tokens = record.name_tokens();
    if record_tokens.is_empty() {
        return 0.0;
    }
    let shared = query_tokens
        .iter()
        .filter(|t| record_tokens.iter().any(|r| r == *t))
        .count();
    shared as f64 / query_tokens.len() as f64
}

/// Pre-filter one dataset: exact normalized part number always passes,
/// otherwise at least one shared name token is required.
fn prefilter<'a>(
    line_part: &str,
    line_tokens: &[String],
    records: impl Iterator<Item = ReferenceRecord> + 'a,
    out: &mut Vec<(f64, ReferenceRecord)>,
) {
    for record in records {
        let part_hit = !line_part.is_empty() && record.norm_part_number() == line_part;
        let ratio = overlap_ratio(line_tokens, &record);
        if part_hit || ratio > 0.0 {
            // Part hits rank ahead of any token overlap.
            let rank = if part_hit { 2.0 + ratio } else { ratio };
            out.push((rank, record));
        }
    }
}

impl CandidateSource for ReferenceIndex {
    fn candidates(
        &self,
        line: &RawLineItem,
        sources: SourceSet,
        top_k: usize,
    ) -> Result<Vec<ReferenceRecord>, IndexError> {
        let line_part = line.norm_part_number();
        let line_tokens = name_tokens(&line.material_name);

        let mut ranked: Vec<(f64, ReferenceRecord)> = Vec::new();
        if sources.item_master {
            if let Some(master) = &self.master {
                prefilter(
                    &line_part,
                    &line_tokens,
                    master.records().iter().cloned(),
                    &mut ranked,
                );
            }
        }
        if sources.knowledge_base {
            prefilter(
                &line_part,
                &line_tokens,
                self.kb.snapshot().into_iter(),
                &mut ranked,
            );
        }

        // Deterministic order: overlap rank desc, then source priority,
        // then ascending id. Ranks are ratios of small integers, never NaN.
        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.source.priority().cmp(&b.1.source.priority()))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        ranked.truncate(top_k);
        Ok(ranked.into_iter().map(|(_, r)| r).collect())
    }
}
