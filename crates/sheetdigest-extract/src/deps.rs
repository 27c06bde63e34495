//! Formula dependency extraction.
//!
//! A lexical scan, not a formula parser: A1-style cell and range tokens
//! are pulled out of the formula text with regular expressions. Function
//! names and defined names never match the token shape, so false positives
//! are limited to quoted string literals that happen to look like
//! addresses, which is acceptable for a provenance hint.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?[A-Z]{1,3}\$?\d+:\$?[A-Z]{1,3}\$?\d+").expect("range pattern compiles")
});

static CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?[A-Z]{1,3}\$?\d+").expect("cell pattern compiles"));

/// Cell and range references the formula reads, deduplicated and sorted.
///
/// Ranges absorb the single-cell tokens inside them, so `=SUM(A1:A5)`
/// yields `["A1:A5"]` rather than the endpoints as well. Tokens are kept
/// exactly as matched, absolute markers included, so `$A$1` and `A1` are
/// distinct entries. Anything that does not start with `=` yields nothing.
pub fn extract_dependencies(formula: &str) -> Vec<String> {
    if !formula.starts_with('=') {
        return Vec::new();
    }

    let mut deps = BTreeSet::new();
    let mut range_spans: Vec<(usize, usize)> = Vec::new();
    for m in RANGE_RE.find_iter(formula) {
        range_spans.push((m.start(), m.end()));
        deps.insert(m.as_str().to_string());
    }
    for m in CELL_RE.find_iter(formula) {
        let covered = range_spans
            .iter()
            .any(|&(start, end)| m.start() >= start && m.end() <= end);
        if !covered {
            deps.insert(m.as_str().to_string());
        }
    }
    deps.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_absorbs_endpoints() {
        assert_eq!(extract_dependencies("=SUM(A1:A5)"), vec!["A1:A5"]);
    }

    #[test]
    fn test_single_cells() {
        assert_eq!(extract_dependencies("=A1+B2"), vec!["A1", "B2"]);
    }

    #[test]
    fn test_mixed_cells_and_ranges() {
        assert_eq!(
            extract_dependencies("=SUM(B2:B10)/C1"),
            vec!["B2:B10", "C1"]
        );
    }

    #[test]
    fn test_absolute_markers_kept_verbatim() {
        assert_eq!(extract_dependencies("=$A$1+B2"), vec!["$A$1", "B2"]);
    }

    #[test]
    fn test_absolute_and_relative_forms_are_distinct() {
        assert_eq!(extract_dependencies("=A1+$A$1"), vec!["$A$1", "A1"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(extract_dependencies("=A1+A1+A1"), vec!["A1"]);
    }

    #[test]
    fn test_sorted_output() {
        assert_eq!(extract_dependencies("=C3+A1+B2"), vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_not_a_formula() {
        assert_eq!(extract_dependencies("A1+B2"), Vec::<String>::new());
        assert_eq!(extract_dependencies("plain text"), Vec::<String>::new());
    }

    #[test]
    fn test_no_references() {
        assert_eq!(extract_dependencies("=1+2"), Vec::<String>::new());
        assert_eq!(extract_dependencies("=NOW()"), Vec::<String>::new());
    }
}
