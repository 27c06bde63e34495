//! Convenience re-exports for typical use

pub use sheetdigest_core::{
    Cell, CellAddress, CellRange, CellScalar, Chunk, ChunkKind, Document, ExtractOptions,
    Lineage, LineageNode, NamedRangeEntry, OrderedMap, Section, SheetDigest, Table, ValueKind,
    WorkbookMeta,
};
pub use sheetdigest_extract::{chunk_lines, extract_workbook, ExtractError, ExtractResult};
pub use sheetdigest_xlsx::{WorkbookView, XlsxError, XlsxResult};
