//! # sheetdigest-core
//!
//! Core data structures for the sheetdigest workbook extractor:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and ranges
//! - [`CellScalar`] and [`ValueKind`] - typed, JSON-safe cell values
//! - [`Document`] and friends - the serialized output model
//! - [`ExtractOptions`] - the conversion switches
//!
//! ## Example
//!
//! ```rust
//! use sheetdigest_core::{CellAddress, CellRange};
//!
//! let range = CellRange::parse("A1:B2").unwrap();
//! let cells: Vec<String> = range.cells().map(|a| a.to_string()).collect();
//! assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
//! ```

pub mod address;
pub mod document;
pub mod error;
pub mod options;

// Re-exports for convenience
pub use address::{CellAddress, CellRange};
pub use document::{
    Cell, CellScalar, Chunk, ChunkKind, Document, Lineage, LineageNode, NamedRangeEntry,
    OrderedMap, Section, SheetDigest, Table, ValueKind, WorkbookMeta,
};
pub use error::{Error, Result};
pub use options::{ExtractOptions, DEFAULT_CHUNK_MAX_CELLS};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
