use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

use extract::{normalize_text, RawLineItem};

use crate::types::{RecordSource, ReferenceRecord};

/// Process-wide store of approved reference records.
///
/// Append-mostly: approval promotions insert, nothing in the core deletes.
/// The map is sharded by key (dashmap), so concurrent inserts from many
/// workflows contend only per shard, and each record carries its own
/// version. Iteration order of the shards is not deterministic; every read
/// path that surfaces records sorts by id before returning.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    records: DashMap<u64, ReferenceRecord>,
    next_id: AtomicU64,
}

/// Aggregate counters for the knowledge-base listing endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KbStats {
    pub total_records: usize,
    pub distinct_vendors: usize,
    pub distinct_item_types: usize,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, e.g. from a persisted export.
    pub fn with_records(lines: &[RawLineItem]) -> Self {
        let kb = Self::new();
        for line in lines {
            kb.insert(line);
        }
        kb
    }

    /// Append a record, assigning the next stable id. Returns the stored record.
    pub fn insert(&self, line: &RawLineItem) -> ReferenceRecord {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = ReferenceRecord::from_line(id, RecordSource::KnowledgeBase, line);
        tracing::debug!(kb_id = id, material = %record.material_name, "knowledge base insert");
        self.records.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: u64) -> Option<ReferenceRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by id. Used by matching and by the listing API.
    pub fn snapshot(&self) -> Vec<ReferenceRecord> {
        let mut all: Vec<ReferenceRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| r.id);
        all
    }

    /// Case-insensitive substring search over name, part number, and vendor.
    pub fn search(&self, needle: &str, limit: usize) -> Vec<ReferenceRecord> {
        let needle = normalize_text(needle);
        let mut hits: Vec<ReferenceRecord> = self
            .records
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.norm_material_name().contains(&needle)
                    || normalize_text(&r.part_number).contains(&needle)
                    || normalize_text(&r.vendor_name).contains(&needle)
            })
            .map(|r| r.value().clone())
            .collect();
        hits.sort_by_key(|r| r.id);
        hits.truncate(limit);
        hits
    }

    pub fn stats(&self) -> KbStats {
        let mut vendors = std::collections::BTreeSet::new();
        let mut item_types = std::collections::BTreeSet::new();
        for r in self.records.iter() {
            let vendor = normalize_text(&r.vendor_name);
            if !vendor.is_empty() {
                vendors.insert(vendor);
            }
            let item_type = normalize_text(&r.item_type);
            if !item_type.is_empty() {
                item_types.insert(item_type);
            }
        }
        KbStats {
            total_records: self.records.len(),
            distinct_vendors: vendors.len(),
            distinct_item_types: item_types.len(),
        }
    }
}
