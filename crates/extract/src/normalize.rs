//! Normalization helpers shared by scoring, indexing, and content hashing.
//!
//! All three consumers must agree on canonical forms, otherwise a row that
//! matched during processing hashes to a different approval key after an
//! edit that only changed casing or spacing. Everything here is pure and
//! deterministic across platforms.

/// Lowercase and collapse runs of whitespace to single spaces.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

/// Canonical part number: uppercase alphanumerics only.
///
/// Separator conventions differ between item masters and shop-floor
/// documents ("PN-100", "PN 100", "pn100"), so equality is defined over the
/// stripped form. An empty result means the line has no usable part number.
pub fn normalize_part_number(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Tokens of the normalized material name, for cheap overlap pre-filtering.
pub fn name_tokens(name: &str) -> Vec<String> {
    normalize_text(name)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_collapses_whitespace_and_case() {
        assert_eq!(normalize_text("  Viton   O-Ring \t Seal "), "viton o-ring seal");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn part_numbers_compare_across_separator_conventions() {
        assert_eq!(normalize_part_number("PN-100"), "PN100");
        assert_eq!(normalize_part_number("pn 100"), "PN100");
        assert_eq!(normalize_part_number("pn_100"), "PN100");
        assert_ne!(normalize_part_number("PN-100"), normalize_part_number("PN-101"));
        assert_eq!(normalize_part_number("--- "), "");
    }

    #[test]
    fn name_tokens_strip_punctuation() {
        assert_eq!(name_tokens("Viton O-Ring, 2mm"), vec!["viton", "oring", "2mm"]);
        assert!(name_tokens(" , . ").is_empty());
    }

    #[test]
    fn normalization_is_stable_under_repetition() {
        let once = normalize_text("Loctite  243 Threadlocker");
        assert_eq!(normalize_text(&once), once);
    }
}
