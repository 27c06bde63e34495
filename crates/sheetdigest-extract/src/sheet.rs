//! Per-sheet assembly.
//!
//! Pulls the grid, formulas and sidecar metadata for one sheet through the
//! feature extractors and produces the [`SheetDigest`] the document carries.
//! Everything here is deterministic: cells in row-major order, tables in
//! declaration order, sections and chunks top-to-bottom.

use sheetdigest_core::{
    CellAddress, ExtractOptions, Lineage, LineageNode, OrderedMap, SheetDigest,
};
use sheetdigest_xlsx::{SheetFormulas, SheetGrid, SheetMeta};

use crate::chunks::build_chunks;
use crate::normalize::build_cell;
use crate::sections::detect_sections;
use crate::tables::harvest_tables;

/// Assemble the digest for one sheet
pub fn assemble_sheet(
    grid: &SheetGrid,
    formulas: &SheetFormulas,
    meta: Option<&SheetMeta>,
    sheet_name: &str,
    opts: &ExtractOptions,
) -> SheetDigest {
    let frozen_panes = meta.and_then(|m| m.frozen_panes.clone());
    let merged_ranges = meta.map(|m| m.merged_ranges.clone()).unwrap_or_default();

    let cells = if opts.include_cells {
        let mut map = OrderedMap::new();
        for (&(r, c), scalar) in grid.iter() {
            let addr = CellAddress::new(r, c as u16).to_string();
            let formula = formulas.get(r, c);
            let hyperlink = meta.and_then(|m| m.hyperlinks.get(&addr)).map(|s| s.as_str());
            let comment = meta.and_then(|m| m.comments.get(&addr)).map(|s| s.as_str());
            map.insert(addr, build_cell(scalar, formula, hyperlink, comment, opts));
        }
        Some(map)
    } else {
        None
    };

    let tables = if opts.include_excel_tables {
        let declared = meta.map(|m| m.tables.as_slice()).unwrap_or(&[]);
        harvest_tables(grid, declared)
    } else {
        Vec::new()
    };

    let sections = if opts.include_inferred_sections {
        detect_sections(grid)
    } else {
        Vec::new()
    };

    // The lineage graph is collected from the assembled cell map, so it
    // needs both cells and formulas enabled.
    let lineage = match &cells {
        Some(map) if opts.include_formulas => {
            let nodes = map
                .iter()
                .filter_map(|(addr, cell)| {
                    cell.f.as_ref().map(|formula| LineageNode {
                        cell: addr.to_string(),
                        formula: formula.clone(),
                        deps: cell.deps.clone().unwrap_or_default(),
                    })
                })
                .collect();
            Some(Lineage { nodes })
        }
        _ => None,
    };

    let chunks = build_chunks(sheet_name, &tables, &sections, opts.chunk_max_cells);

    SheetDigest {
        dims: grid.dims(),
        frozen_panes,
        merged_ranges,
        cells,
        tables,
        sections,
        lineage,
        chunks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetdigest_core::CellScalar;

    fn text(s: &str) -> CellScalar {
        CellScalar::Text(s.to_string())
    }

    #[test]
    fn test_cells_row_major_order() {
        let grid = SheetGrid::from_cells(vec![
            ((1, 0), text("a2")),
            ((0, 1), text("b1")),
            ((0, 0), text("a1")),
        ]);
        let digest = assemble_sheet(
            &grid,
            &SheetFormulas::default(),
            None,
            "S",
            &ExtractOptions::default(),
        );
        let keys: Vec<&str> = digest.cells.as_ref().unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A1", "B1", "A2"]);
    }

    #[test]
    fn test_cells_disabled() {
        let grid = SheetGrid::from_cells(vec![((0, 0), text("x"))]);
        let opts = ExtractOptions {
            include_cells: false,
            ..ExtractOptions::default()
        };
        let digest = assemble_sheet(&grid, &SheetFormulas::default(), None, "S", &opts);
        assert!(digest.cells.is_none());
        // Lineage requires the cell map
        assert!(digest.lineage.is_none());
        // Sections still run off the grid
        assert_eq!(digest.sections.len(), 1);
    }

    #[test]
    fn test_empty_sheet_digest() {
        let digest = assemble_sheet(
            &SheetGrid::default(),
            &SheetFormulas::default(),
            None,
            "Empty",
            &ExtractOptions::default(),
        );
        assert_eq!(digest.dims, "A1:A1");
        assert!(digest.cells.as_ref().unwrap().is_empty());
        assert!(digest.tables.is_empty());
        assert!(digest.sections.is_empty());
        assert!(digest.chunks.is_empty());
        assert!(digest.lineage.as_ref().unwrap().nodes.is_empty());
    }
}
