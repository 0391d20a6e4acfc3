use serde::{Deserialize, Serialize};

use extract::RawLineItem;
use refindex::ReferenceRecord;

/// Configuration for the scoring stage.
///
/// Serde-friendly with defaults so it can sit inside higher-level configs
/// and be overridden per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Candidates scoring below this are dropped from the ranked list.
    /// An empty list means "no reference match found", not an error.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: f64,
    /// Bound on the candidate set requested from the reference index.
    #[serde(default = "MatchConfig::default_top_k")]
    pub top_k: usize,
}

impl MatchConfig {
    pub(crate) fn default_min_score() -> f64 {
        0.55
    }

    pub(crate) fn default_top_k() -> usize {
        25
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: Self::default_min_score(),
            top_k: Self::default_top_k(),
        }
    }
}

/// One reference record with its final score for a given line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReference {
    pub record: ReferenceRecord,
    /// Final score in [0, 1].
    pub score: f64,
    /// Whether the normalized part numbers matched exactly.
    pub part_exact: bool,
}

/// Matcher output for one line: the line plus its ranked candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub line: RawLineItem,
    /// Ordered best-first: part-exact hits before name-only hits, then
    /// score descending, source priority, ascending record id.
    pub candidates: Vec<ScoredReference>,
}

impl MatchCandidate {
    /// Best-ranked candidate, if any survived the minimum-score cut.
    pub fn best(&self) -> Option<&ScoredReference> {
        self.candidates.first()
    }

    /// Whether candidates from more than one source survived, which makes a
    /// review decision genuinely ambiguous.
    pub fn has_conflicting_sources(&self) -> bool {
        self.candidates
            .windows(2)
            .any(|w| w[0].record.source != w[1].record.source)
    }
}
