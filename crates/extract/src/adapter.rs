use serde::Deserialize;
use thiserror::Error;

use crate::types::RawLineItem;

/// Errors from an extraction adapter.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The payload could not be decoded into line rows.
    #[error("document payload is not decodable: {0}")]
    Malformed(String),
    /// The payload decoded but contained no line rows.
    #[error("document produced no line items")]
    Empty,
}

/// Boundary trait for whatever turns an uploaded document into line rows.
///
/// Real deployments plug in their parser here; the core only consumes the
/// ordered row sequence and never re-reads the document bytes.
pub trait ExtractionAdapter: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<Vec<RawLineItem>, ExtractError>;
}

/// Adapter for callers that upload rows already extracted, as a JSON array.
///
/// Accepts either a bare array or an object with a `rows` field, matching
/// the two shapes upstream extractors produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRowsAdapter;

#[derive(Deserialize)]
#[serde(untagged)]
enum RowsPayload {
    Bare(Vec<RawLineItem>),
    Wrapped { rows: Vec<RawLineItem> },
}

impl ExtractionAdapter for JsonRowsAdapter {
    fn extract(&self, document: &[u8]) -> Result<Vec<RawLineItem>, ExtractError> {
        let payload: RowsPayload = serde_json::from_slice(document)
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;
        let rows = match payload {
            RowsPayload::Bare(rows) => rows,
            RowsPayload::Wrapped { rows } => rows,
        };
        if rows.is_empty() {
            return Err(ExtractError::Empty);
        }
        tracing::debug!(rows = rows.len(), "extracted line items from JSON payload");
        Ok(rows)
    }
}
