//! Named-range resolution.
//!
//! Defined names arrive as raw declaration text like
//! `'Q1 Data'!$A$1:$B$4,Sheet2!$C$1`. Each comma-separated part (commas
//! inside quoted sheet names do not split) resolves to a
//! sheet-plus-reference entry. A name whose parts all fail to resolve is
//! kept with its raw text so nothing silently disappears, and a failure to
//! read the whole table collapses to a single diagnostic entry.

use once_cell::sync::Lazy;
use regex::Regex;
use sheetdigest_core::NamedRangeEntry;
use sheetdigest_xlsx::DefinedName;

/// Builtin names (print areas, filter databases) are not user content
const BUILTIN_PREFIX: &str = "_xlnm.";

static REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?[A-Z]{1,3}\$?\d+(:\$?[A-Z]{1,3}\$?\d+)?$").expect("ref pattern compiles")
});

/// Resolve the defined-names table into output entries
pub fn resolve_named_ranges(
    defined: &Result<Vec<DefinedName>, String>,
) -> Vec<NamedRangeEntry> {
    let names = match defined {
        Ok(names) => names,
        Err(e) => {
            return vec![NamedRangeEntry::Error {
                error: format!("named-range-parse: {}", e),
            }]
        }
    };

    let mut entries = Vec::new();
    for defined_name in names {
        if defined_name.name.starts_with(BUILTIN_PREFIX) {
            continue;
        }
        let mut resolved_any = false;
        for part in split_destinations(&defined_name.refers_to) {
            if let Some((sheet, reference)) = parse_destination(&part) {
                entries.push(NamedRangeEntry::Resolved {
                    name: defined_name.name.clone(),
                    sheet,
                    reference: Some(reference),
                });
                resolved_any = true;
            }
        }
        if !resolved_any {
            entries.push(NamedRangeEntry::Resolved {
                name: defined_name.name.clone(),
                sheet: None,
                reference: Some(defined_name.refers_to.clone()),
            });
        }
    }
    entries
}

/// Split a refers-to string on commas, respecting quoted sheet names
fn split_destinations(refers_to: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in refers_to.chars() {
        match ch {
            '\'' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Parse one destination of the form `['Sheet name'!]$A$1[:$B$2]`.
///
/// Returns the sheet (if any) and the reference with absolute markers
/// stripped, or `None` when the part is not a plain cell/range address
/// (formulas and external references stay unresolved).
fn parse_destination(part: &str) -> Option<(Option<String>, String)> {
    let part = part.trim();
    let (sheet, reference) = match part.rsplit_once('!') {
        Some((sheet, reference)) => {
            let sheet = sheet.trim();
            let sheet = if sheet.starts_with('\'') && sheet.ends_with('\'') && sheet.len() >= 2 {
                sheet[1..sheet.len() - 1].replace("''", "'")
            } else {
                sheet.to_string()
            };
            (Some(sheet), reference)
        }
        None => (None, part),
    };
    if REF_RE.is_match(reference) {
        Some((sheet, reference.replace('$', "")))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defined(name: &str, refers_to: &str) -> DefinedName {
        DefinedName {
            name: name.to_string(),
            refers_to: refers_to.to_string(),
        }
    }

    #[test]
    fn test_simple_range() {
        let entries = resolve_named_ranges(&Ok(vec![defined("Revenue", "Data!$B$2:$B$10")]));
        assert_eq!(
            entries,
            vec![NamedRangeEntry::Resolved {
                name: "Revenue".to_string(),
                sheet: Some("Data".to_string()),
                reference: Some("B2:B10".to_string()),
            }]
        );
    }

    #[test]
    fn test_quoted_sheet_name_with_comma() {
        let entries =
            resolve_named_ranges(&Ok(vec![defined("X", "'Q1, final'!$A$1,Sheet2!$C$3")]));
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            NamedRangeEntry::Resolved {
                name: "X".to_string(),
                sheet: Some("Q1, final".to_string()),
                reference: Some("A1".to_string()),
            }
        );
        assert_eq!(
            entries[1],
            NamedRangeEntry::Resolved {
                name: "X".to_string(),
                sheet: Some("Sheet2".to_string()),
                reference: Some("C3".to_string()),
            }
        );
    }

    #[test]
    fn test_unresolvable_name_keeps_raw_text() {
        let entries = resolve_named_ranges(&Ok(vec![defined("Rate", "0.0825")]));
        assert_eq!(
            entries,
            vec![NamedRangeEntry::Resolved {
                name: "Rate".to_string(),
                sheet: None,
                reference: Some("0.0825".to_string()),
            }]
        );
    }

    #[test]
    fn test_builtin_names_skipped() {
        let entries = resolve_named_ranges(&Ok(vec![
            defined("_xlnm.Print_Area", "Data!$A$1:$C$5"),
            defined("Kept", "Data!$A$1"),
        ]));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_no_names_yields_empty_list() {
        assert_eq!(
            resolve_named_ranges(&Ok(vec![])),
            Vec::<NamedRangeEntry>::new()
        );
    }

    #[test]
    fn test_table_failure_collapses_to_diagnostic() {
        let entries = resolve_named_ranges(&Err("truncated XML".to_string()));
        assert_eq!(
            entries,
            vec![NamedRangeEntry::Error {
                error: "named-range-parse: truncated XML".to_string(),
            }]
        );
    }

    #[test]
    fn test_escaped_quote_in_sheet_name() {
        let entries = resolve_named_ranges(&Ok(vec![defined("Y", "'Bob''s sheet'!$A$2")]));
        assert_eq!(
            entries,
            vec![NamedRangeEntry::Resolved {
                name: "Y".to_string(),
                sheet: Some("Bob's sheet".to_string()),
                reference: Some("A2".to_string()),
            }]
        );
    }
}
