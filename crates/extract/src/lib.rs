//! Extraction boundary for the BOM reconciliation pipeline.
//!
//! Document parsing itself lives outside this workspace; whatever extracts a
//! work-instruction or QC document is expected to hand the core an ordered
//! sequence of [`RawLineItem`] records. This crate owns that boundary: the
//! line-item shape, the [`ExtractionAdapter`] trait the core consumes, a JSON
//! rows adapter for callers that ship pre-extracted rows, and the text
//! normalization helpers every downstream stage shares so that scoring and
//! hashing agree on what "the same value" means.

pub mod adapter;
pub mod normalize;
pub mod types;

pub use adapter::{ExtractError, ExtractionAdapter, JsonRowsAdapter};
pub use normalize::{name_tokens, normalize_part_number, normalize_text};
pub use types::{ItemType, RawLineItem};
