//! Text section detection.
//!
//! A section is a maximal run of consecutive rows that each contain at
//! least one text cell. The emitted range is the bounding box whose
//! column edges come from the run's text-bearing cells; within those
//! edges every non-blank cell (numbers included) joins the rendered
//! text, one line per row with cell display strings space-joined, so
//! prose that interleaves labels and figures survives intact.

use std::collections::BTreeMap;

use sheetdigest_core::{CellRange, CellScalar, Section};
use sheetdigest_xlsx::SheetGrid;

/// A text cell for section purposes: a string with non-whitespace content
fn is_section_text(scalar: &CellScalar) -> bool {
    scalar
        .as_text()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false)
}

/// Detect text sections over a sheet's values
pub fn detect_sections(grid: &SheetGrid) -> Vec<Section> {
    // Row index -> non-blank cells of that row, in column order
    let mut rows: BTreeMap<u32, Vec<(u32, &CellScalar)>> = BTreeMap::new();
    for (&(r, c), scalar) in grid.iter() {
        rows.entry(r).or_default().push((c, scalar));
    }

    let max_row = grid.max_row();
    let mut sections = Vec::new();
    let mut run: Vec<u32> = Vec::new();
    for r in 0..max_row {
        let has_text = rows
            .get(&r)
            .map(|cells| cells.iter().any(|(_, s)| is_section_text(s)))
            .unwrap_or(false);
        if has_text {
            run.push(r);
        } else if !run.is_empty() {
            sections.push(render_section(&run, &rows));
            run.clear();
        }
    }
    if !run.is_empty() {
        sections.push(render_section(&run, &rows));
    }
    sections
}

fn render_section(run: &[u32], rows: &BTreeMap<u32, Vec<(u32, &CellScalar)>>) -> Section {
    // Column edges come from text cells only; a lone number off to the
    // side of a caption does not widen the box.
    let mut min_col = u32::MAX;
    let mut max_col = 0u32;
    for &r in run {
        if let Some(cells) = rows.get(&r) {
            for &(c, scalar) in cells {
                if is_section_text(scalar) {
                    min_col = min_col.min(c);
                    max_col = max_col.max(c);
                }
            }
        }
    }

    let mut lines = Vec::with_capacity(run.len());
    for &r in run {
        let Some(cells) = rows.get(&r) else { continue };
        let line: Vec<String> = cells
            .iter()
            .filter(|&&(c, s)| {
                c >= min_col && c <= max_col && !s.display().trim().is_empty()
            })
            .map(|(_, s)| s.display())
            .collect();
        if !line.is_empty() {
            lines.push(line.join(" "));
        }
    }

    // A run always holds at least one text cell, so the box is non-empty
    let start_row = run[0];
    let end_row = run[run.len() - 1];
    let range = CellRange::from_indices(start_row, min_col as u16, end_row, max_col as u16);
    Section {
        range: range.to_a1_string(),
        text: lines.join("\n"),
    }
}
