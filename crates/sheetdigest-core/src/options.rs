//! Extraction configuration

/// Default per-chunk cell-list truncation bound
pub const DEFAULT_CHUNK_MAX_CELLS: usize = 400;

/// Switches controlling which parts of the document are produced.
///
/// Every boolean is independent: disabling one never implicitly disables
/// another, with the single documented exception that the lineage graph
/// requires both `include_cells` and `include_formulas` (it is collected
/// from the assembled cell map). Chunks are always built from whatever
/// tables/sections exist.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Attach formula text and dependency lists to cells
    pub include_formulas: bool,
    /// Emit the per-sheet cells map
    pub include_cells: bool,
    /// Attach hyperlink/comment fields to cells
    pub include_comments: bool,
    /// Emit the workbook-level named_ranges list
    pub include_named_ranges: bool,
    /// Harvest declared tables
    pub include_excel_tables: bool,
    /// Run the text section detector
    pub include_inferred_sections: bool,
    /// Per-chunk cell-list truncation bound (0 = no cells listed)
    pub chunk_max_cells: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_formulas: true,
            include_cells: true,
            include_comments: true,
            include_named_ranges: true,
            include_excel_tables: true,
            include_inferred_sections: true,
            chunk_max_cells: DEFAULT_CHUNK_MAX_CELLS,
        }
    }
}
