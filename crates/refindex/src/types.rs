use serde::{Deserialize, Serialize};
use thiserror::Error;

use extract::{name_tokens, normalize_part_number, normalize_text, RawLineItem};

/// Which reference dataset a record came from.
///
/// Source participates in deterministic tie-breaking: at equal score the
/// item master outranks the knowledge base, because it is the dataset the
/// caller supplied for exactly this workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    ItemMaster,
    KnowledgeBase,
}

impl RecordSource {
    /// Lower sorts first at equal score.
    pub fn priority(self) -> u8 {
        match self {
            RecordSource::ItemMaster => 0,
            RecordSource::KnowledgeBase => 1,
        }
    }
}

/// A reference row from either dataset.
///
/// Same field shape as a raw line item, plus the source tag, a stable id
/// unique within its source, and a version bumped on every mutation of the
/// stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: u64,
    pub source: RecordSource,
    pub version: u64,
    #[serde(default)]
    pub qc_process_or_wi_step: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub material_name: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub qty: String,
    #[serde(default)]
    pub uom: String,
    #[serde(default)]
    pub vendor_name: String,
}

impl ReferenceRecord {
    /// Build a record from extracted line fields.
    pub fn from_line(id: u64, source: RecordSource, line: &RawLineItem) -> Self {
        Self {
            id,
            source,
            version: 1,
            qc_process_or_wi_step: line.qc_process_or_wi_step.clone(),
            item_type: line.item_type.clone(),
            material_name: line.material_name.clone(),
            part_number: line.part_number.clone(),
            qty: line.qty.clone(),
            uom: line.uom.clone(),
            vendor_name: line.vendor_name.clone(),
        }
    }

    pub fn norm_part_number(&self) -> String {
        normalize_part_number(&self.part_number)
    }

    pub fn norm_material_name(&self) -> String {
        normalize_text(&self.material_name)
    }

    pub fn name_tokens(&self) -> Vec<String> {
        name_tokens(&self.material_name)
    }
}

/// Errors from reference data access.
///
/// An unreadable knowledge base is reported, never silently degraded:
/// `kb_only` workflows have no other dataset to fall back on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("reference index unavailable: {0}")]
    Unavailable(String),
}
