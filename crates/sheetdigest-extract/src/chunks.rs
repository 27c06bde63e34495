//! Chunk building.
//!
//! Chunks are the retrieval units: one per harvested table and one per
//! detected section, each with a deterministic content-addressed id and a
//! bounded list of covered cell addresses. Ids depend only on sheet, kind
//! and range, so re-running the conversion over the same workbook yields
//! the same ids.

use sha2::{Digest, Sha256};
use sheetdigest_core::{CellAddress, CellRange, Chunk, ChunkKind, Section, Table};

/// Deterministic chunk identifier:
/// `<sheet lowercased>_<range lowercased, ':' as '_'>_<4 hex digest chars>`
pub fn chunk_id(sheet: &str, kind: ChunkKind, range: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}::{}", kind.as_str(), range).as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!(
        "{}_{}_{}",
        sheet.to_lowercase(),
        range.to_lowercase().replace(':', "_"),
        &digest[..4]
    )
}

/// Expand an `A1:B2`-style range into row-major cell addresses.
///
/// Anything that is not a two-endpoint range expands to nothing; chunk
/// ranges always carry both endpoints, so an empty expansion marks a
/// malformed range rather than a single cell.
pub fn expand_range(range: &str) -> Vec<String> {
    let Some((start, end)) = range.split_once(':') else {
        return Vec::new();
    };
    match (CellAddress::parse(start), CellAddress::parse(end)) {
        (Ok(start), Ok(end)) => CellRange::new(start, end)
            .cells()
            .map(|addr| addr.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Build the chunk list for one sheet: tables first, then sections
pub fn build_chunks(
    sheet: &str,
    tables: &[Table],
    sections: &[Section],
    max_cells: usize,
) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(tables.len() + sections.len());
    for table in tables {
        let text = format!(
            "Table {} with {} rows. Columns: {}.",
            table.name,
            table.records.len(),
            table.headers.join(", ")
        );
        chunks.push(make_chunk(sheet, ChunkKind::Table, &table.range, text, max_cells));
    }
    for section in sections {
        chunks.push(make_chunk(
            sheet,
            ChunkKind::Section,
            &section.range,
            section.text.clone(),
            max_cells,
        ));
    }
    chunks
}

fn make_chunk(
    sheet: &str,
    kind: ChunkKind,
    range: &str,
    text: String,
    max_cells: usize,
) -> Chunk {
    let mut cells = expand_range(range);
    cells.truncate(max_cells);
    Chunk {
        chunk_id: chunk_id(sheet, kind, range),
        kind,
        sheet: sheet.to_string(),
        range: range.to_string(),
        text,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chunk_id_shape_and_determinism() {
        let id = chunk_id("Summary", ChunkKind::Section, "A1:B2");
        assert!(id.starts_with("summary_a1_b2_"));
        assert_eq!(id.len(), "summary_a1_b2_".len() + 4);
        assert_eq!(id, chunk_id("Summary", ChunkKind::Section, "A1:B2"));
    }

    #[test]
    fn test_chunk_id_distinguishes_kinds() {
        let a = chunk_id("S", ChunkKind::Table, "A1:B2");
        let b = chunk_id("S", ChunkKind::Section, "A1:B2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_expand_range_row_major() {
        assert_eq!(expand_range("A1:B2"), vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_expand_range_rejects_single_cell_and_garbage() {
        assert_eq!(expand_range("A5"), Vec::<String>::new());
        assert_eq!(expand_range("nope:nope"), Vec::<String>::new());
        assert_eq!(expand_range(""), Vec::<String>::new());
    }

    #[test]
    fn test_cells_truncate_to_cap() {
        let tables = vec![Table {
            name: "T".to_string(),
            range: "A1:J10".to_string(),
            headers: vec![],
            records: vec![],
        }];
        let chunks = build_chunks("Data", &tables, &[], 5);
        assert_eq!(chunks[0].cells.len(), 5);
        assert_eq!(chunks[0].cells, vec!["A1", "B1", "C1", "D1", "E1"]);
    }

    #[test]
    fn test_zero_cap_lists_no_cells() {
        let sections = vec![Section {
            range: "A1:A3".to_string(),
            text: "x".to_string(),
        }];
        let chunks = build_chunks("Data", &[], &sections, 0);
        assert!(chunks[0].cells.is_empty());
    }

    #[test]
    fn test_tables_precede_sections() {
        let tables = vec![Table {
            name: "T".to_string(),
            range: "A1:A2".to_string(),
            headers: vec!["H".to_string()],
            records: vec![],
        }];
        let sections = vec![Section {
            range: "C1:C1".to_string(),
            text: "note".to_string(),
        }];
        let chunks = build_chunks("Data", &tables, &sections, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].kind, ChunkKind::Table);
        assert_eq!(chunks[0].text, "Table T with 0 rows. Columns: H.");
        assert_eq!(chunks[1].kind, ChunkKind::Section);
    }
}
