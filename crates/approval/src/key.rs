//! Composite keys for approval items.
//!
//! The key must be stable across saves: the same workflow row hashes to the
//! same key even when the caller re-saved an identical set, and a content
//! edit produces a new key (the edited row is a new promotion candidate).
//! Fields are hashed in normalized form so whitespace and casing edits do
//! not mint new keys, with a separator byte between fields so adjacent
//! values cannot collide by concatenation.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use classifier::MatchResult;
use extract::{normalize_part_number, normalize_text};

const FIELD_SEPARATOR: u8 = 0x1f;

/// SHA-256 over the workflow id and the row's normalized content, hex-encoded.
pub fn composite_key(workflow_id: Uuid, row: &MatchResult) -> String {
    let mut hasher = Sha256::new();
    hasher.update(workflow_id.as_bytes());
    for field in [
        normalize_text(&row.qc_process_or_wi_step),
        normalize_text(&row.item_type),
        normalize_text(&row.material_name),
        normalize_part_number(&row.part_number),
        normalize_text(&row.qty),
        normalize_text(&row.uom),
        normalize_text(&row.vendor_name),
    ] {
        hasher.update([FIELD_SEPARATOR]);
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}
