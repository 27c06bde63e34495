//! Typed grid views over the workbook content.
//!
//! [`ValueView`] carries the cached cell values per sheet, already narrowed
//! to [`CellScalar`]; [`FormulaView`] carries the raw formula strings. The
//! two are read from independent passes over the same bytes so that neither
//! mutates state the other depends on.

use std::collections::{BTreeMap, HashMap};

use calamine::{Data, Range};
use chrono::{Duration, NaiveDate, NaiveTime};
use sheetdigest_core::{CellAddress, CellScalar};

/// Cached values for one sheet, keyed by zero-based (row, col).
///
/// Blank cells and empty strings are not stored; iteration order is
/// row-major, which the assemblers rely on for deterministic output.
#[derive(Debug, Default)]
pub struct SheetGrid {
    cells: BTreeMap<(u32, u32), CellScalar>,
    start: Option<(u32, u32)>,
    end: Option<(u32, u32)>,
}

impl SheetGrid {
    pub(crate) fn from_range(range: &Range<Data>) -> Self {
        let mut cells = BTreeMap::new();
        if let (Some(start), Some(end)) = (range.start(), range.end()) {
            for (r, row) in range.rows().enumerate() {
                for (c, data) in row.iter().enumerate() {
                    if let Some(scalar) = scalar_from_data(data) {
                        cells.insert((start.0 + r as u32, start.1 + c as u32), scalar);
                    }
                }
            }
            Self {
                cells,
                start: Some(start),
                end: Some(end),
            }
        } else {
            Self::default()
        }
    }

    /// Build a grid directly from (row, col) -> scalar pairs
    pub fn from_cells(cells: Vec<((u32, u32), CellScalar)>) -> Self {
        let mut grid = Self::default();
        for ((r, c), scalar) in cells {
            grid.start = Some(match grid.start {
                Some((sr, sc)) => (sr.min(r), sc.min(c)),
                None => (r, c),
            });
            grid.end = Some(match grid.end {
                Some((er, ec)) => (er.max(r), ec.max(c)),
                None => (r, c),
            });
            grid.cells.insert((r, c), scalar);
        }
        grid
    }

    /// Value at a zero-based (row, col), if non-blank
    pub fn get(&self, row: u32, col: u32) -> Option<&CellScalar> {
        self.cells.get(&(row, col))
    }

    /// Non-blank cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (&(u32, u32), &CellScalar)> {
        self.cells.iter()
    }

    /// Whether the sheet has no stored values
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Used dimensions in A1 form; an empty sheet reports "A1:A1"
    pub fn dims(&self) -> String {
        match (self.start, self.end) {
            (Some((sr, sc)), Some((er, ec))) => format!(
                "{}:{}",
                CellAddress::new(sr, sc as u16),
                CellAddress::new(er, ec as u16)
            ),
            _ => "A1:A1".to_string(),
        }
    }

    /// One-based index of the last used row; 0 when the sheet is empty
    pub fn max_row(&self) -> u32 {
        self.end.map(|(r, _)| r + 1).unwrap_or(0)
    }

    /// One-based index of the last used column; 0 when the sheet is empty
    pub fn max_col(&self) -> u32 {
        self.end.map(|(_, c)| c + 1).unwrap_or(0)
    }
}

/// Cached values for every sheet, in workbook order
#[derive(Debug, Default)]
pub struct ValueView {
    sheets: Vec<SheetGrid>,
}

impl ValueView {
    pub(crate) fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    /// Grid for the sheet at the given workbook index
    pub fn sheet(&self, index: usize) -> Option<&SheetGrid> {
        self.sheets.get(index)
    }
}

/// Formula strings for one sheet, keyed by zero-based (row, col).
///
/// Strings are stored with the leading `=` so they match how formulas
/// appear in the formula bar.
#[derive(Debug, Default)]
pub struct SheetFormulas {
    cells: HashMap<(u32, u32), String>,
}

impl SheetFormulas {
    pub(crate) fn from_range(range: &Range<String>) -> Self {
        let mut cells = HashMap::new();
        if let Some(start) = range.start() {
            for (r, row) in range.rows().enumerate() {
                for (c, f) in row.iter().enumerate() {
                    if !f.is_empty() {
                        let stored = if f.starts_with('=') {
                            f.clone()
                        } else {
                            format!("={}", f)
                        };
                        cells.insert((start.0 + r as u32, start.1 + c as u32), stored);
                    }
                }
            }
        }
        Self { cells }
    }

    /// Formula at a zero-based (row, col), if any
    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(|s| s.as_str())
    }

    /// Whether the sheet has no formulas
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Formula strings for every sheet, in workbook order
#[derive(Debug, Default)]
pub struct FormulaView {
    sheets: Vec<SheetFormulas>,
}

impl FormulaView {
    pub(crate) fn new(sheets: Vec<SheetFormulas>) -> Self {
        Self { sheets }
    }

    /// Formulas for the sheet at the given workbook index
    pub fn sheet(&self, index: usize) -> Option<&SheetFormulas> {
        self.sheets.get(index)
    }
}

/// Narrow a raw cell value to the output scalar set.
///
/// Blanks and empty strings collapse to `None` so they never enter the
/// document. Cached formula errors become their spreadsheet display text,
/// which keeps them visible to the section detector.
fn scalar_from_data(data: &Data) -> Option<CellScalar> {
    match data {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(CellScalar::Text(s.clone()))
            }
        }
        Data::Float(f) => Some(CellScalar::Number(*f)),
        Data::Int(i) => Some(CellScalar::Number(*i as f64)),
        Data::Bool(b) => Some(CellScalar::Bool(*b)),
        Data::DateTime(dt) => Some(CellScalar::Datetime(serial_to_iso(dt.as_f64()))),
        Data::DateTimeIso(s) => Some(CellScalar::Datetime(s.clone())),
        Data::DurationIso(s) => Some(CellScalar::Text(s.clone())),
        Data::Error(e) => Some(CellScalar::Text(error_text(e).to_string())),
    }
}

fn error_text(e: &calamine::CellErrorType) -> &'static str {
    use calamine::CellErrorType::*;
    match e {
        Div0 => "#DIV/0!",
        NA => "#N/A",
        Name => "#NAME?",
        Null => "#NULL!",
        Num => "#NUM!",
        Ref => "#REF!",
        Value => "#VALUE!",
        GettingData => "#GETTING_DATA",
    }
}

/// Convert an Excel serial date to an ISO-8601 string.
///
/// Serial day 0 is 1899-12-30 (the 1900 date system with its leap-year
/// bug folded in). Pure dates render as `YYYY-MM-DD`; values with a time
/// fraction render as a full `YYYY-MM-DDTHH:MM:SS`.
fn serial_to_iso(serial: f64) -> String {
    let epoch = match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(d) => d,
        None => return format!("{}", serial),
    };
    let days = serial.trunc() as i64;
    let date = epoch + Duration::days(days);
    let frac = serial.fract();
    if frac == 0.0 {
        return date.format("%Y-%m-%d").to_string();
    }
    let total_seconds = (frac * 86_400.0).round() as u32;
    let time = NaiveTime::from_hms_opt(
        (total_seconds / 3600).min(23),
        (total_seconds / 60) % 60,
        total_seconds % 60,
    )
    .unwrap_or_default();
    date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serial_to_iso_pure_date() {
        // 2024-01-15 is serial 45306 in the 1900 date system
        assert_eq!(serial_to_iso(45306.0), "2024-01-15");
    }

    #[test]
    fn test_serial_to_iso_with_time() {
        // Noon on the same day
        assert_eq!(serial_to_iso(45306.5), "2024-01-15T12:00:00");
    }

    #[test]
    fn test_serial_epoch() {
        assert_eq!(serial_to_iso(1.0), "1899-12-31");
    }

    #[test]
    fn test_scalar_from_data_blank_and_empty_string() {
        assert_eq!(scalar_from_data(&Data::Empty), None);
        assert_eq!(scalar_from_data(&Data::String(String::new())), None);
    }

    #[test]
    fn test_scalar_from_data_error_is_text() {
        let scalar = scalar_from_data(&Data::Error(calamine::CellErrorType::Div0));
        assert_eq!(scalar, Some(CellScalar::Text("#DIV/0!".to_string())));
    }

    #[test]
    fn test_scalar_from_data_bool_is_bool() {
        let scalar = scalar_from_data(&Data::Bool(true));
        assert_eq!(scalar, Some(CellScalar::Bool(true)));
    }

    #[test]
    fn test_formula_prefixing() {
        let range = Range::<String>::from_sparse(vec![
            calamine::Cell::new((0, 1), "A1*2".to_string()),
            calamine::Cell::new((1, 1), "=SUM(A1:A2)".to_string()),
        ]);
        let formulas = SheetFormulas::from_range(&range);
        assert_eq!(formulas.get(0, 1), Some("=A1*2"));
        assert_eq!(formulas.get(1, 1), Some("=SUM(A1:A2)"));
        assert_eq!(formulas.get(0, 0), None);
    }

    #[test]
    fn test_grid_dims_and_lookup() {
        let range = Range::<Data>::from_sparse(vec![
            calamine::Cell::new((0, 0), Data::String("Title".to_string())),
            calamine::Cell::new((2, 1), Data::Float(3.5)),
        ]);
        let grid = SheetGrid::from_range(&range);
        assert_eq!(grid.dims(), "A1:B3");
        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.get(0, 0), Some(&CellScalar::Text("Title".to_string())));
        assert_eq!(grid.get(1, 0), None);
    }

    #[test]
    fn test_empty_grid_dims() {
        let grid = SheetGrid::default();
        assert_eq!(grid.dims(), "A1:A1");
        assert_eq!(grid.max_row(), 0);
        assert!(grid.is_empty());
    }
}
