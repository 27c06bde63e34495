//! XLSX view error types

use thiserror::Error;

/// Result type for workbook-view operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while opening the workbook views
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Grid reader error (the workbook could not be opened as xlsx/xlsm)
    #[error("Workbook error: {0}")]
    Grid(#[from] calamine::XlsxError),
}
