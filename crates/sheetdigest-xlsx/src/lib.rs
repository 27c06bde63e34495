//! # sheetdigest-xlsx
//!
//! Read-only views over an `.xlsx`/`.xlsm` workbook:
//! - [`ValueView`] - cached cell values per sheet, typed as [`sheetdigest_core::CellScalar`]
//! - [`FormulaView`] - formula strings per sheet, `=`-prefixed
//! - [`SidecarMeta`] - best-effort package metadata (properties, panes,
//!   merges, hyperlinks, comments, tables, defined names)
//!
//! [`WorkbookView::open`] bundles all three from one byte buffer. Failing to
//! open the workbook at all is an error; everything past that point degrades
//! per sheet or per part with a logged warning.

pub mod error;
pub mod sidecar;
pub mod view;

pub use error::{XlsxError, XlsxResult};
pub use sidecar::{DeclaredTable, DefinedName, SheetMeta, SidecarMeta};
pub use view::{FormulaView, SheetFormulas, SheetGrid, ValueView};

use std::io::Cursor;

use calamine::{Reader, Xlsx};

/// All views over one workbook, opened from a single byte buffer.
///
/// Values and formulas are read in independent passes so neither reader's
/// cursor state leaks into the other.
#[derive(Debug)]
pub struct WorkbookView {
    /// Sheet names in workbook order
    pub sheet_names: Vec<String>,
    /// Cached cell values
    pub values: ValueView,
    /// Formula strings
    pub formulas: FormulaView,
    /// Package metadata
    pub meta: SidecarMeta,
}

impl WorkbookView {
    /// Open every view over the given workbook bytes.
    ///
    /// Returns an error only when the bytes are not a readable xlsx
    /// package. A sheet whose values or formulas cannot be read comes back
    /// empty, with a warning logged.
    pub fn open(bytes: &[u8]) -> XlsxResult<Self> {
        let mut value_book: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let mut formula_book: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let sheet_names = value_book.sheet_names().to_vec();

        let mut grids = Vec::with_capacity(sheet_names.len());
        let mut formula_sheets = Vec::with_capacity(sheet_names.len());
        for name in &sheet_names {
            match value_book.worksheet_range(name) {
                Ok(range) => grids.push(SheetGrid::from_range(&range)),
                Err(e) => {
                    log::warn!("values for sheet {:?} unavailable: {}", name, e);
                    grids.push(SheetGrid::default());
                }
            }
            match formula_book.worksheet_formula(name) {
                Ok(range) => formula_sheets.push(SheetFormulas::from_range(&range)),
                Err(e) => {
                    log::warn!("formulas for sheet {:?} unavailable: {}", name, e);
                    formula_sheets.push(SheetFormulas::default());
                }
            }
        }

        Ok(Self {
            sheet_names,
            values: ValueView::new(grids),
            formulas: FormulaView::new(formula_sheets),
            meta: SidecarMeta::read(bytes),
        })
    }
}
