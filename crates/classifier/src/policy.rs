use serde::{Deserialize, Serialize};

use extract::ItemType;
use matcher::MatchCandidate;
use refindex::RecordSource;

use crate::result::{ActionPath, Decision};

/// Fixed reasoning for caller-privileged rows. Preserved verbatim through
/// every subsequent save.
pub const OVERRIDE_REASONING: &str = "manually added and pre-approved";

/// Confidence thresholds for the classification policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// At or above this, a knowledge-base part-number hit auto-registers.
    #[serde(default = "ClassifierConfig::default_high_confidence")]
    pub high_confidence: f64,
    /// At or above this, a candidate is worth a human look.
    #[serde(default = "ClassifierConfig::default_low_confidence")]
    pub low_confidence: f64,
}

impl ClassifierConfig {
    pub(crate) fn default_high_confidence() -> f64 {
        0.92
    }

    pub(crate) fn default_low_confidence() -> f64 {
        0.60
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_confidence: Self::default_high_confidence(),
            low_confidence: Self::default_low_confidence(),
        }
    }
}

/// Apply the policy to one scored candidate set.
///
/// Priority order:
/// 1. high-confidence knowledge-base hit with exact part number → auto-register;
/// 2. any candidate at or above the low threshold → human review;
/// 3. otherwise: lines with no material name and no part number are rejected
///    as non-material; everything else goes to human review, with reasoning
///    that names a missing field when one is the cause.
///
/// Never fails. Caller overrides do not pass through here at all; they are
/// a separate [`Decision`] variant.
pub fn classify(candidate: &MatchCandidate, cfg: &ClassifierConfig) -> Decision {
    let line = &candidate.line;

    if let Some(best) = candidate.best() {
        // Rule 1 asks whether the top-ranked sources include an approved
        // knowledge-base record with the exact part number. Part-exact hits
        // all score 1.0 and sort before name-only hits, so scanning the
        // part-exact prefix covers "the item master ranked first" in full
        // comparison mode.
        let kb_exact = candidate
            .candidates
            .iter()
            .take_while(|c| c.part_exact)
            .find(|c| c.record.source == RecordSource::KnowledgeBase && c.score >= cfg.high_confidence);
        if let Some(hit) = kb_exact {
            return Decision::Classifier {
                action: ActionPath::AutoRegister,
                reasoning: format!(
                    "exact part number match against knowledge base record {} (score {:.2})",
                    hit.record.id, hit.score
                ),
            };
        }

        if best.score >= cfg.low_confidence {
            let source = match best.record.source {
                RecordSource::ItemMaster => "item master",
                RecordSource::KnowledgeBase => "knowledge base",
            };
            let ambiguity = if candidate.has_conflicting_sources() {
                "; conflicting candidates exist in both reference sources"
            } else if best.part_exact {
                "; part number matches but the reference is not an approved knowledge base record"
            } else {
                "; name similarity alone is not conclusive"
            };
            return Decision::Classifier {
                action: ActionPath::HumanReview,
                reasoning: format!(
                    "best candidate is {source} record {} at score {:.2}{ambiguity}",
                    best.record.id, best.score
                ),
            };
        }
    }

    // No candidate cleared the low-confidence bar.
    if !line.has_identity() {
        return Decision::Classifier {
            action: ActionPath::Reject,
            reasoning: "non-material line: no material name and no part number".into(),
        };
    }

    let missing = if line.material_name.trim().is_empty() {
        Some("material name")
    } else if line.part_number.trim().is_empty() {
        Some("part number")
    } else {
        None
    };

    let reasoning = match (line.item_kind(), missing) {
        (ItemType::Consumable, None) => {
            "no reference match above the confidence threshold for this consumable".to_string()
        }
        (_, Some(field)) => {
            format!("no confident reference match and the {field} is missing")
        }
        (_, None) => "no reference match above the confidence threshold".to_string(),
    };

    Decision::Classifier {
        action: ActionPath::HumanReview,
        reasoning,
    }
}
