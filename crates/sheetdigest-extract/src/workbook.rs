//! Workbook-level assembly.
//!
//! Opens the views over the workbook bytes, runs every sheet through the
//! per-sheet assembler in declaration order, and attaches the workbook
//! metadata and the named-range table.

use sheetdigest_core::{Document, ExtractOptions, OrderedMap, WorkbookMeta};
use sheetdigest_xlsx::{SheetFormulas, SheetGrid, WorkbookView};

use crate::error::ExtractResult;
use crate::names::resolve_named_ranges;
use crate::sheet::assemble_sheet;

/// Convert workbook bytes into the output document.
///
/// `title` is the caller-supplied workbook name (usually the file name);
/// it is carried verbatim into the document. Fails only when the bytes
/// cannot be opened as a workbook.
pub fn extract_workbook(
    bytes: &[u8],
    title: &str,
    opts: &ExtractOptions,
) -> ExtractResult<Document> {
    let view = WorkbookView::open(bytes)?;

    let empty_grid = SheetGrid::default();
    let empty_formulas = SheetFormulas::default();

    let mut sheets = OrderedMap::new();
    for (idx, name) in view.sheet_names.iter().enumerate() {
        let grid = view.values.sheet(idx).unwrap_or(&empty_grid);
        let formulas = view.formulas.sheet(idx).unwrap_or(&empty_formulas);
        let digest = assemble_sheet(grid, formulas, view.meta.sheet(name), name, opts);
        sheets.insert(name.clone(), digest);
    }

    let named_ranges = if opts.include_named_ranges {
        Some(resolve_named_ranges(&view.meta.defined_names))
    } else {
        None
    };

    Ok(Document {
        workbook: WorkbookMeta {
            title: title.to_string(),
            sheets: view.sheet_names.clone(),
            created: view.meta.created.clone(),
            modified: view.meta.modified.clone(),
        },
        sheets,
        named_ranges,
    })
}
