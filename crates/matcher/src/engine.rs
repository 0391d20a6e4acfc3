use strsim::jaro_winkler;

use extract::RawLineItem;
use refindex::ReferenceRecord;

use crate::types::{MatchCandidate, MatchConfig, ScoredReference};

/// Score candidates for one line and return the ranked match set.
///
/// The candidates are whatever the reference index pre-filtered; this
/// function owns the precise score and the final ordering. An empty result
/// is a valid outcome meaning no reference match was found.
pub fn match_line(
    line: &RawLineItem,
    candidates: &[ReferenceRecord],
    cfg: &MatchConfig,
) -> MatchCandidate {
    let line_part = line.norm_part_number();
    let line_name = line.norm_material_name();

    let mut scored: Vec<ScoredReference> = candidates
        .iter()
        .filter_map(|record| {
            let part_exact = !line_part.is_empty() && record.norm_part_number() == line_part;
            let score = score_record(part_exact, &line_name, record);
            if part_exact || score >= cfg.min_score {
                Some(ScoredReference {
                    record: record.clone(),
                    score,
                    part_exact,
                })
            } else {
                None
            }
        })
        .collect();

    // Part-exact hits first regardless of name similarity, then score
    // descending. Scores are jaro_winkler outputs or exactly 1.0, never
    // NaN, so partial_cmp is total here. Remaining ties break on source
    // priority and ascending record id for reproducible output.
    scored.sort_by(|a, b| {
        b.part_exact
            .cmp(&a.part_exact)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.record.source.priority().cmp(&b.record.source.priority()))
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    tracing::trace!(
        material = %line.material_name,
        candidates = scored.len(),
        "scored line against reference set"
    );

    MatchCandidate {
        line: line.clone(),
        candidates: scored,
    }
}

fn score_record(part_exact: bool, line_name: &str, record: &ReferenceRecord) -> f64 {
    if part_exact {
        return 1.0;
    }
    let record_name = record.norm_material_name();
    if line_name.is_empty() || record_name.is_empty() {
        return 0.0;
    }
    jaro_winkler(line_name, &record_name)
}
