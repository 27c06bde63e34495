//! # sheetdigest
//!
//! Extract AI-friendly structured JSON from Excel workbooks: typed cells,
//! formula dependency lists, declared tables projected into records,
//! inferred text sections, named ranges, and retrieval-ready chunks.
//!
//! This facade crate re-exports the member crates:
//! - [`core`] - addressing, the output document model, options
//! - [`xlsx`] - read-only workbook views (values, formulas, metadata)
//! - [`extract`] - the extraction pipeline
//!
//! ## Example
//!
//! ```no_run
//! use sheetdigest::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("report.xlsx")?;
//! let document = extract_workbook(&bytes, "report.xlsx", &ExtractOptions::default())?;
//! for (name, sheet) in document.sheets.iter() {
//!     println!("{}: {} chunks", name, sheet.chunks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub use sheetdigest_core as core;
pub use sheetdigest_extract as extract;
pub use sheetdigest_xlsx as xlsx;

pub mod prelude;
