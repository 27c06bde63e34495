//! Cell record assembly.
//!
//! Folds a typed scalar together with its formula, hyperlink and comment
//! (as the options allow) into the [`Cell`] record the document carries.

use sheetdigest_core::{Cell, CellScalar, ExtractOptions};

use crate::deps::extract_dependencies;

/// Build the output record for one non-empty cell.
///
/// The `f`/`deps` pair appears only for formula cells when formulas are
/// enabled. The `hyperlink`/`comment` keys appear (possibly null) exactly
/// when comment extraction is enabled, so a consumer can distinguish
/// "not extracted" from "extracted, none present".
pub fn build_cell(
    scalar: &CellScalar,
    formula: Option<&str>,
    hyperlink: Option<&str>,
    comment: Option<&str>,
    opts: &ExtractOptions,
) -> Cell {
    let (f, deps) = match formula {
        Some(formula) if opts.include_formulas => (
            Some(formula.to_string()),
            Some(extract_dependencies(formula)),
        ),
        _ => (None, None),
    };
    let (hyperlink, comment) = if opts.include_comments {
        (
            Some(hyperlink.map(str::to_string)),
            Some(comment.map(str::to_string)),
        )
    } else {
        (None, None)
    };
    Cell {
        v: scalar.clone(),
        t: scalar.kind(),
        display: scalar.display(),
        f,
        deps,
        hyperlink,
        comment,
    }
}
