use extract::RawLineItem;

use crate::types::{RecordSource, ReferenceRecord};

/// Per-workflow index over the caller-supplied item master.
///
/// Built once when the workflow is created, read-only afterwards, dropped
/// with the workflow. Ids are positions in the supplied rows, which keeps
/// candidate ordering reproducible for identical uploads.
#[derive(Debug, Default)]
pub struct ItemMasterIndex {
    records: Vec<ReferenceRecord>,
}

impl ItemMasterIndex {
    pub fn build(rows: &[RawLineItem]) -> Self {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ReferenceRecord::from_line(i as u64 + 1, RecordSource::ItemMaster, row))
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
