//! # sheetdigest-extract
//!
//! The extraction pipeline: turns workbook bytes into the structured
//! [`Document`], running cell normalization, formula dependency
//! extraction, text section detection, table harvesting, named-range
//! resolution and chunk building per [`ExtractOptions`].
//!
//! The only fatal failure is a workbook that cannot be opened; every
//! optional feature degrades with a logged warning instead of aborting
//! the conversion.
//!
//! ## Example
//!
//! ```no_run
//! use sheetdigest_core::ExtractOptions;
//! use sheetdigest_extract::extract_workbook;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("report.xlsx")?;
//! let document = extract_workbook(&bytes, "report.xlsx", &ExtractOptions::default())?;
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! # Ok(())
//! # }
//! ```

pub mod chunks;
pub mod deps;
pub mod error;
pub mod names;
pub mod normalize;
pub mod sections;
pub mod sheet;
pub mod tables;
pub mod workbook;

pub use error::{ExtractError, ExtractResult};
pub use workbook::extract_workbook;

use serde::Serialize;
use sheetdigest_core::{ChunkKind, Document};

/// One NDJSON line: the chunk without its cell list
#[derive(Serialize)]
struct ChunkLine<'a> {
    chunk_id: &'a str,
    sheet: &'a str,
    range: &'a str,
    kind: ChunkKind,
    text: &'a str,
}

/// Flatten the document's chunks into NDJSON lines, one chunk per line,
/// in sheet order then chunk order
pub fn chunk_lines(document: &Document) -> ExtractResult<Vec<String>> {
    let mut lines = Vec::new();
    for (_, sheet) in document.sheets.iter() {
        for chunk in &sheet.chunks {
            lines.push(serde_json::to_string(&ChunkLine {
                chunk_id: &chunk.chunk_id,
                sheet: &chunk.sheet,
                range: &chunk.range,
                kind: chunk.kind,
                text: &chunk.text,
            })?);
        }
    }
    Ok(lines)
}
