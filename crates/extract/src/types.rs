use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_part_number, normalize_text};

/// One line item extracted from a work-instruction or QC document.
///
/// Every field is free text and may be empty; extraction quality varies by
/// source document and nothing downstream is allowed to fail on a blank
/// field. A record is immutable once extracted and owned by a single
/// workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLineItem {
    /// QC process or work-instruction step the line belongs to.
    #[serde(default)]
    pub qc_process_or_wi_step: String,
    /// Free-text item type, e.g. "Consumable" or "Tool".
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

impl RawLineItem {
    /// Parsed item type; free text maps onto a small closed set.
    pub fn item_kind(&self) -> ItemType {
        ItemType::parse(&self.item_type)
    }

    /// True when the line carries at least one identifying field.
    ///
    /// A line with neither a material name nor a part number is not a
    /// material line (headers, section dividers, torn cells) and gets
    /// filtered by the classifier rather than matched.
    pub fn has_identity(&self) -> bool {
        !self.material_name.trim().is_empty() || !self.part_number.trim().is_empty()
    }

    /// Canonical part number for equality comparisons.
    pub fn norm_part_number(&self) -> String {
        normalize_part_number(&self.part_number)
    }

    /// Canonical material name for similarity scoring.
    pub fn norm_material_name(&self) -> String {
        normalize_text(&self.material_name)
    }
}

/// Closed item-type vocabulary used by classification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Consumable,
    Tool,
    Equipment,
    /// Anything the vocabulary does not recognize, including blank.
    Other,
}

impl ItemType {
    /// Map free text onto the vocabulary. Matching is case- and
    /// whitespace-insensitive and tolerates plural forms.
    pub fn parse(text: &str) -> Self {
        match normalize_text(text).as_str() {
            "consumable" | "consumables" => ItemType::Consumable,
            "tool" | "tools" | "tooling" => ItemType::Tool,
            "equipment" => ItemType::Equipment,
            _ => ItemType::Other,
        }
    }
}
