//! Extraction pipeline error types

use thiserror::Error;

/// Result type for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Errors that abort a conversion.
///
/// Only failing to open the workbook (or to serialize the result) is
/// fatal; per-feature problems degrade inside the pipeline instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The workbook could not be opened
    #[error("workbook error: {0}")]
    Workbook(#[from] sheetdigest_xlsx::XlsxError),

    /// The document could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
