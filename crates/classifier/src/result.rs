use serde::{Deserialize, Serialize};

use extract::RawLineItem;

use crate::policy::OVERRIDE_REASONING;

/// Classification outcome for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPath {
    AutoRegister,
    HumanReview,
    Reject,
}

/// How a row's action path came to be.
///
/// `CallerOverride` is not a classifier outcome; it is the privileged path
/// for rows the caller added or force-approved, and it always resolves to
/// `auto_register` with a fixed reasoning string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    Classifier {
        action: ActionPath,
        reasoning: String,
    },
    CallerOverride,
}

impl Decision {
    pub fn action(&self) -> ActionPath {
        match self {
            Decision::Classifier { action, .. } => *action,
            Decision::CallerOverride => ActionPath::AutoRegister,
        }
    }

    pub fn reasoning(&self) -> &str {
        match self {
            Decision::Classifier { reasoning, .. } => reasoning,
            Decision::CallerOverride => OVERRIDE_REASONING,
        }
    }
}

/// The editable unit shown to the caller: the line's fields plus the
/// decision. Re-processing re-derives a fresh set; caller edits replace the
/// stored set wholesale through the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
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
    pub action_path: ActionPath,
    pub reasoning: String,
    /// Caller-added row, never produced by extraction.
    #[serde(default)]
    pub is_new: bool,
}

impl MatchResult {
    /// Build a result row from a line and a decision.
    pub fn from_decision(line: &RawLineItem, decision: &Decision) -> Self {
        Self {
            qc_process_or_wi_step: line.qc_process_or_wi_step.clone(),
            item_type: line.item_type.clone(),
            material_name: line.material_name.clone(),
            part_number: line.part_number.clone(),
            qty: line.qty.clone(),
            uom: line.uom.clone(),
            vendor_name: line.vendor_name.clone(),
            action_path: decision.action(),
            reasoning: decision.reasoning().to_string(),
            is_new: matches!(decision, Decision::CallerOverride),
        }
    }

    /// The row's fields viewed as a line item, for hashing and promotion.
    pub fn as_line(&self) -> RawLineItem {
        RawLineItem {
            qc_process_or_wi_step: self.qc_process_or_wi_step.clone(),
            item_type: self.item_type.clone(),
            material_name: self.material_name.clone(),
            part_number: self.part_number.clone(),
            qty: self.qty.clone(),
            uom: self.uom.clone(),
            vendor_name: self.vendor_name.clone(),
        }
    }
}

/// Summary counters over a result set.
///
/// Always recomputed from the rows; nothing mutates a counter directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub auto_register: usize,
    pub human_review: usize,
    pub reject: usize,
}

impl Summary {
    pub fn compute(results: &[MatchResult]) -> Self {
        let mut summary = Summary {
            total: results.len(),
            ..Default::default()
        };
        for row in results {
            match row.action_path {
                ActionPath::AutoRegister => summary.auto_register += 1,
                ActionPath::HumanReview => summary.human_review += 1,
                ActionPath::Reject => summary.reject += 1,
            }
        }
        summary
    }
}
