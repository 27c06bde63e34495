//! Output document model.
//!
//! These types serialize to the JSON document consumed by retrieval
//! pipelines. Field names and key layout are part of the output contract,
//! so everything here derives `Serialize` with explicit renames where the
//! wire name is not a valid Rust identifier.
//!
//! Maps whose key order matters (the sheets map, the per-sheet cells map,
//! table records) use [`OrderedMap`], which serializes entries in insertion
//! order. Combined with the assemblers inserting in sheet-declaration /
//! row-major order, repeated conversions of the same input produce
//! byte-identical JSON.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A typed, JSON-safe cell value.
///
/// The closed set of variants makes misclassification unrepresentable:
/// a boolean can never be reported as a number. Temporal values are
/// carried as ISO-8601 strings, already safe to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellScalar {
    /// Numeric value (integers and floats alike)
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Date or datetime, serialized to ISO-8601
    Datetime(String),
    /// Everything else, including cached formula error strings
    Text(String),
}

impl CellScalar {
    /// The classification tag reported in the `t` field
    pub fn kind(&self) -> ValueKind {
        match self {
            CellScalar::Number(_) => ValueKind::Number,
            CellScalar::Bool(_) => ValueKind::Bool,
            CellScalar::Datetime(_) => ValueKind::Datetime,
            CellScalar::Text(_) => ValueKind::String,
        }
    }

    /// Human-readable display string for the value.
    ///
    /// Fractionless numbers display in integer form ("42", not "42.0")
    /// and booleans display as spreadsheet-style TRUE/FALSE.
    pub fn display(&self) -> String {
        match self {
            CellScalar::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellScalar::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellScalar::Datetime(s) | CellScalar::Text(s) => s.clone(),
        }
    }

    /// The text content, if this is a text scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellScalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Classification tag for a [`CellScalar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Number,
    Bool,
    Datetime,
    String,
}

/// A map that serializes entries in insertion order.
///
/// `serde_json`'s default map type re-sorts keys only when asked to; rather
/// than depend on a feature flag for ordering, the few maps in the output
/// contract keep their entries in a Vec and serialize it as a JSON object.
/// Lookup is linear, which is fine for the sizes involved (sheets per
/// workbook, headers per table).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry; existing keys are not checked
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    /// Look up the first entry with the given key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One non-empty cell of the output document
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    /// Typed value
    pub v: CellScalar,
    /// Classification tag
    pub t: ValueKind,
    /// Display string
    pub display: String,
    /// Formula text, present only for formula cells when formulas are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,
    /// References the formula reads, present alongside `f`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deps: Option<Vec<String>>,
    /// Hyperlink target; the key is present (possibly null) only when
    /// comment/hyperlink extraction is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<Option<String>>,
    /// Comment text; same presence rule as `hyperlink`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,
}

/// A declared (not inferred) table
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub name: String,
    pub range: String,
    /// Header labels from the first row of the range, blanks as ""
    pub headers: Vec<String>,
    /// Data rows projected into header-keyed records, blank-filled
    pub records: Vec<OrderedMap<String>>,
}

/// An inferred rectangular block of free-form text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// `TopLeft:BottomRight` address notation
    pub range: String,
    /// One line per row, cells space-joined
    pub text: String,
}

/// One resolved named-range entry, or a diagnostic stub when the whole
/// defined-names table failed to parse
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NamedRangeEntry {
    Resolved {
        name: String,
        /// Sheet the destination points at; null for unresolvable raw text
        sheet: Option<String>,
        /// Reference string, or the raw declaration text when unresolvable
        #[serde(rename = "ref")]
        reference: Option<String>,
    },
    Error { error: String },
}

/// Chunk provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Table,
    Section,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Table => "table",
            ChunkKind::Section => "section",
        }
    }
}

/// A bounded, addressable retrieval unit
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// Deterministic, content-addressed identifier
    pub chunk_id: String,
    pub kind: ChunkKind,
    pub sheet: String,
    pub range: String,
    /// Human-readable summary text
    pub text: String,
    /// Covered cell addresses, row-major, truncated to the configured cap
    pub cells: Vec<String>,
}

/// One formula-bearing cell in the lineage graph
#[derive(Debug, Clone, Serialize)]
pub struct LineageNode {
    pub cell: String,
    pub formula: String,
    pub deps: Vec<String>,
}

/// Per-sheet formula dependency graph (recorded, never evaluated)
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lineage {
    pub nodes: Vec<LineageNode>,
}

/// Everything extracted from one sheet
#[derive(Debug, Clone, Serialize)]
pub struct SheetDigest {
    /// Used-range dimensions, `A1:A1` for an empty sheet
    pub dims: String,
    /// Top-left cell of the scrollable region when panes are frozen
    pub frozen_panes: Option<String>,
    pub merged_ranges: Vec<String>,
    /// Address → cell map in row-major order; absent when cells are disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<OrderedMap<Cell>>,
    pub tables: Vec<Table>,
    pub sections: Vec<Section>,
    /// Absent unless both cells and formulas are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Lineage>,
    pub chunks: Vec<Chunk>,
}

/// Workbook-level metadata snapshot
#[derive(Debug, Clone, Serialize)]
pub struct WorkbookMeta {
    /// Caller-supplied file name
    pub title: String,
    /// Sheet names in declaration order
    pub sheets: Vec<String>,
    /// Creation timestamp (ISO-8601) if the workbook carries one
    pub created: Option<String>,
    /// Modification timestamp (ISO-8601) if the workbook carries one
    pub modified: Option<String>,
}

/// The fully assembled conversion result
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub workbook: WorkbookMeta,
    /// Sheet name → digest, in sheet-declaration order
    pub sheets: OrderedMap<SheetDigest>,
    /// Present only when named-range extraction is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_ranges: Option<Vec<NamedRangeEntry>>,
}
