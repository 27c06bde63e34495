//! Declared table harvesting.
//!
//! Tables come from the workbook's own ListObject declarations, never from
//! layout inference. The declared range is projected onto the value grid:
//! the first row supplies headers (blank header cells stay "") and every
//! following row becomes a header-keyed record.

use sheetdigest_core::{CellRange, OrderedMap, Table};
use sheetdigest_xlsx::{DeclaredTable, SheetGrid};

/// Project declared tables onto the sheet's values.
///
/// A table whose range does not parse is still reported, with its raw
/// range text and no headers or records, so the declaration is never
/// silently dropped.
pub fn harvest_tables(grid: &SheetGrid, declared: &[DeclaredTable]) -> Vec<Table> {
    declared
        .iter()
        .map(|decl| match CellRange::parse(&decl.range) {
            Ok(range) => project_table(grid, decl, &range),
            Err(e) => {
                log::warn!("table {:?} has unusable range {:?}: {}", decl.name, decl.range, e);
                Table {
                    name: decl.name.clone(),
                    range: decl.range.clone(),
                    headers: Vec::new(),
                    records: Vec::new(),
                }
            }
        })
        .collect()
}

fn project_table(grid: &SheetGrid, decl: &DeclaredTable, range: &CellRange) -> Table {
    let (start, end) = (range.start, range.end);

    let mut headers = Vec::with_capacity(range.col_count() as usize);
    for col in start.col..=end.col {
        let label = grid
            .get(start.row, col as u32)
            .map(|s| s.display())
            .unwrap_or_default();
        headers.push(label);
    }

    let mut records = Vec::new();
    for row in (start.row + 1)..=end.row {
        let mut record = OrderedMap::new();
        for (i, col) in (start.col..=end.col).enumerate() {
            let value = grid
                .get(row, col as u32)
                .map(|s| s.display())
                .unwrap_or_default();
            record.insert(headers[i].clone(), value);
        }
        records.push(record);
    }

    Table {
        name: decl.name.clone(),
        range: decl.range.clone(),
        headers,
        records,
    }
}
