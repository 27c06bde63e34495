//! Best-effort workbook metadata read straight from the package XML.
//!
//! The grid views cover cell content; everything else the document needs
//! (document properties, frozen panes, merged ranges, hyperlinks, comments,
//! declared tables, defined names) comes from walking the OPC parts with a
//! pull parser. Nothing in here fails the conversion: a part that is
//! missing or malformed is logged and its slice of the metadata stays
//! empty.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::XlsxResult;

/// A `definedName` entry from workbook.xml, unparsed
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedName {
    /// The workbook-scoped name
    pub name: String,
    /// The raw refers-to text, e.g. `Sheet1!$A$1:$B$4`
    pub refers_to: String,
}

/// A declared table (ListObject) from xl/tables/*.xml
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredTable {
    /// Display name, falling back to the internal name
    pub name: String,
    /// Table range in A1 form, e.g. `A1:C10`
    pub range: String,
}

/// Per-sheet metadata the grid views cannot see
#[derive(Debug, Default, Clone)]
pub struct SheetMeta {
    /// Top-left cell of the scrollable area when panes are frozen
    pub frozen_panes: Option<String>,
    /// Merged cell ranges in A1 form
    pub merged_ranges: Vec<String>,
    /// External hyperlink targets keyed by anchor cell address
    pub hyperlinks: HashMap<String, String>,
    /// Comment text keyed by anchor cell address
    pub comments: HashMap<String, String>,
    /// Declared tables anchored on this sheet
    pub tables: Vec<DeclaredTable>,
}

/// Workbook-level metadata plus per-sheet [`SheetMeta`], keyed by sheet name
#[derive(Debug)]
pub struct SidecarMeta {
    /// dcterms:created from docProps/core.xml
    pub created: Option<String>,
    /// dcterms:modified from docProps/core.xml
    pub modified: Option<String>,
    /// Defined names, or a diagnostic when the table could not be read
    pub defined_names: std::result::Result<Vec<DefinedName>, String>,
    sheets: HashMap<String, SheetMeta>,
}

impl Default for SidecarMeta {
    fn default() -> Self {
        Self {
            created: None,
            modified: None,
            defined_names: Ok(Vec::new()),
            sheets: HashMap::new(),
        }
    }
}

impl SidecarMeta {
    /// Read the metadata sidecar from workbook bytes. Never fails; parts
    /// that cannot be read degrade to their empty defaults.
    pub fn read(bytes: &[u8]) -> Self {
        let mut meta = Self::default();
        let mut archive = match ZipArchive::new(Cursor::new(bytes.to_vec())) {
            Ok(a) => a,
            Err(e) => {
                log::warn!("metadata archive unavailable: {}", e);
                return meta;
            }
        };

        match read_part(&mut archive, "docProps/core.xml") {
            Ok(Some(xml)) => match parse_core_properties(&xml) {
                Ok((created, modified)) => {
                    meta.created = created;
                    meta.modified = modified;
                }
                Err(e) => log::warn!("core properties unreadable: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("core properties unreadable: {}", e),
        }

        let workbook = match read_part(&mut archive, "xl/workbook.xml") {
            Ok(Some(xml)) => match parse_workbook(&xml) {
                Ok(wb) => wb,
                Err(e) => {
                    log::warn!("workbook part unreadable: {}", e);
                    meta.defined_names = Err(e.to_string());
                    return meta;
                }
            },
            Ok(None) | Err(_) => {
                log::warn!("workbook part missing");
                return meta;
            }
        };
        meta.defined_names = Ok(workbook.defined_names);

        let rels = match read_part(&mut archive, "xl/_rels/workbook.xml.rels") {
            Ok(Some(xml)) => parse_relationships(&xml).unwrap_or_else(|e| {
                log::warn!("workbook relationships unreadable: {}", e);
                HashMap::new()
            }),
            _ => HashMap::new(),
        };

        for (sheet_name, rid) in workbook.sheets {
            let Some(rel) = rels.get(&rid) else {
                log::warn!("no relationship for sheet {:?}", sheet_name);
                meta.sheets.insert(sheet_name, SheetMeta::default());
                continue;
            };
            let path = resolve_target("xl", &rel.target);
            let sheet_meta = read_sheet_meta(&mut archive, &path).unwrap_or_else(|e| {
                log::warn!("sheet metadata for {:?} unreadable: {}", sheet_name, e);
                SheetMeta::default()
            });
            meta.sheets.insert(sheet_name, sheet_meta);
        }

        meta
    }

    /// Metadata for a sheet, by name
    pub fn sheet(&self, name: &str) -> Option<&SheetMeta> {
        self.sheets.get(name)
    }
}

struct WorkbookPart {
    /// (sheet name, relationship id), in workbook order
    sheets: Vec<(String, String)>,
    defined_names: Vec<DefinedName>,
}

struct Relationship {
    rel_type: String,
    target: String,
}

/// Read a package part into a string; a missing part is `None`
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> XlsxResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| {
            let raw = String::from_utf8_lossy(&a.value);
            quick_xml::escape::unescape(&raw)
                .ok()
                .map(|v| v.into_owned())
        })
}

fn parse_core_properties(xml: &str) -> XlsxResult<(Option<String>, Option<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut created = None;
    let mut modified = None;
    // 1 = inside dcterms:created, 2 = inside dcterms:modified
    let mut field = 0u8;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                field = match e.name().as_ref() {
                    b"dcterms:created" => 1,
                    b"dcterms:modified" => 2,
                    _ => 0,
                };
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                match field {
                    1 => created = Some(text),
                    2 => modified = Some(text),
                    _ => {}
                }
            }
            Event::End(_) => field = 0,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((created, modified))
}

fn parse_workbook(xml: &str) -> XlsxResult<WorkbookPart> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut sheets = Vec::new();
    let mut defined_names = Vec::new();
    let mut pending_name: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"sheet" => {
                    if let (Some(name), Some(rid)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, rid));
                    }
                }
                b"definedName" => pending_name = attr_value(&e, b"name"),
                _ => {}
            },
            Event::Text(t) => {
                if let Some(name) = pending_name.take() {
                    defined_names.push(DefinedName {
                        name,
                        refers_to: t.unescape()?.into_owned(),
                    });
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"definedName" {
                    pending_name = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(WorkbookPart {
        sheets,
        defined_names,
    })
}

fn parse_relationships(xml: &str) -> XlsxResult<HashMap<String, Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == b"Relationship" {
                    if let (Some(id), Some(rel_type), Some(target)) = (
                        attr_value(&e, b"Id"),
                        attr_value(&e, b"Type"),
                        attr_value(&e, b"Target"),
                    ) {
                        rels.insert(id, Relationship { rel_type, target });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// Resolve a relationship target against the directory of the source part
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        return stripped.to_string();
    }
    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for seg in target.split('/') {
        match seg {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            s => parts.push(s),
        }
    }
    parts.join("/")
}

struct SheetContent {
    frozen_panes: Option<String>,
    merged_ranges: Vec<String>,
    /// (anchor cell, relationship id) for hyperlinks carrying an r:id
    hyperlink_rids: Vec<(String, String)>,
    table_rids: Vec<String>,
}

fn parse_sheet(xml: &str) -> XlsxResult<SheetContent> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut content = SheetContent {
        frozen_panes: None,
        merged_ranges: Vec::new(),
        hyperlink_rids: Vec::new(),
        table_rids: Vec::new(),
    };
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"pane" => {
                    let frozen = attr_value(&e, b"state")
                        .map(|s| s == "frozen" || s == "frozenSplit")
                        .unwrap_or(false);
                    if frozen {
                        content.frozen_panes = attr_value(&e, b"topLeftCell");
                    }
                }
                b"mergeCell" => {
                    if let Some(r) = attr_value(&e, b"ref") {
                        content.merged_ranges.push(r);
                    }
                }
                b"hyperlink" => {
                    if let (Some(anchor), Some(rid)) =
                        (attr_value(&e, b"ref"), attr_value(&e, b"r:id"))
                    {
                        content.hyperlink_rids.push((anchor, rid));
                    }
                }
                b"tablePart" => {
                    if let Some(rid) = attr_value(&e, b"r:id") {
                        content.table_rids.push(rid);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(content)
}

fn parse_table(xml: &str) -> XlsxResult<Option<DeclaredTable>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == b"table" {
                    let name = attr_value(&e, b"displayName").or_else(|| attr_value(&e, b"name"));
                    let range = attr_value(&e, b"ref");
                    return Ok(match (name, range) {
                        (Some(name), Some(range)) => Some(DeclaredTable { name, range }),
                        _ => None,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(None)
}

fn parse_comments(xml: &str) -> XlsxResult<HashMap<String, String>> {
    // No text trimming here: whitespace inside comment runs is content
    let mut reader = Reader::from_str(xml);

    let mut comments = HashMap::new();
    let mut current_ref: Option<String> = None;
    let mut current_text = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"comment" => {
                    current_ref = attr_value(&e, b"ref");
                    current_text.clear();
                }
                b"t" => in_text = current_ref.is_some(),
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    current_text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"t" => in_text = false,
                b"comment" => {
                    if let Some(anchor) = current_ref.take() {
                        if !current_text.is_empty() {
                            comments.insert(anchor, current_text.clone());
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(comments)
}

fn read_sheet_meta<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_path: &str,
) -> XlsxResult<SheetMeta> {
    let Some(xml) = read_part(archive, sheet_path)? else {
        return Ok(SheetMeta::default());
    };
    let content = parse_sheet(&xml)?;

    let mut meta = SheetMeta {
        frozen_panes: content.frozen_panes,
        merged_ranges: content.merged_ranges,
        ..SheetMeta::default()
    };

    let (dir, base) = match sheet_path.rsplit_once('/') {
        Some((d, b)) => (d.to_string(), b.to_string()),
        None => (String::new(), sheet_path.to_string()),
    };
    let rels_path = format!("{}/_rels/{}.rels", dir, base);
    let rels = match read_part(archive, &rels_path)? {
        Some(rels_xml) => parse_relationships(&rels_xml)?,
        None => HashMap::new(),
    };

    for (anchor, rid) in content.hyperlink_rids {
        if let Some(rel) = rels.get(&rid) {
            meta.hyperlinks.insert(anchor, rel.target.clone());
        }
    }

    for rid in content.table_rids {
        let Some(rel) = rels.get(&rid) else { continue };
        let table_path = resolve_target(&dir, &rel.target);
        match read_part(archive, &table_path)? {
            Some(table_xml) => {
                if let Some(table) = parse_table(&table_xml)? {
                    meta.tables.push(table);
                }
            }
            None => log::warn!("declared table part {:?} missing", table_path),
        }
    }

    for rel in rels.values() {
        if rel.rel_type.ends_with("/comments") {
            let comments_path = resolve_target(&dir, &rel.target);
            if let Some(comments_xml) = read_part(archive, &comments_path)? {
                meta.comments.extend(parse_comments(&comments_xml)?);
            }
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_core_properties() {
        let xml = r#"<?xml version="1.0"?>
            <cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                xmlns:dcterms="http://purl.org/dc/terms/">
                <dcterms:created>2024-01-01T00:00:00Z</dcterms:created>
                <dcterms:modified>2024-06-15T12:30:00Z</dcterms:modified>
            </cp:coreProperties>"#;
        let (created, modified) = parse_core_properties(xml).unwrap();
        assert_eq!(created.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(modified.as_deref(), Some("2024-06-15T12:30:00Z"));
    }

    #[test]
    fn test_parse_workbook_sheets_and_names() {
        let xml = r#"<workbook>
            <sheets>
                <sheet name="Data" sheetId="1" r:id="rId1"/>
                <sheet name="Notes" sheetId="2" r:id="rId2"/>
            </sheets>
            <definedNames>
                <definedName name="Revenue">Data!$B$2:$B$10</definedName>
                <definedName name="_xlnm.Print_Area">Data!$A$1:$C$5</definedName>
            </definedNames>
        </workbook>"#;
        let wb = parse_workbook(xml).unwrap();
        assert_eq!(
            wb.sheets,
            vec![
                ("Data".to_string(), "rId1".to_string()),
                ("Notes".to_string(), "rId2".to_string()),
            ]
        );
        assert_eq!(wb.defined_names.len(), 2);
        assert_eq!(wb.defined_names[0].name, "Revenue");
        assert_eq!(wb.defined_names[0].refers_to, "Data!$B$2:$B$10");
    }

    #[test]
    fn test_parse_sheet_pane_merges_tables() {
        let xml = r#"<worksheet>
            <sheetViews><sheetView workbookViewId="0">
                <pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>
            </sheetView></sheetViews>
            <sheetData/>
            <mergeCells count="1"><mergeCell ref="A1:C1"/></mergeCells>
            <hyperlinks><hyperlink ref="B3" r:id="rId1"/></hyperlinks>
            <tableParts count="1"><tablePart r:id="rId2"/></tableParts>
        </worksheet>"#;
        let content = parse_sheet(xml).unwrap();
        assert_eq!(content.frozen_panes.as_deref(), Some("A2"));
        assert_eq!(content.merged_ranges, vec!["A1:C1".to_string()]);
        assert_eq!(
            content.hyperlink_rids,
            vec![("B3".to_string(), "rId1".to_string())]
        );
        assert_eq!(content.table_rids, vec!["rId2".to_string()]);
    }

    #[test]
    fn test_parse_sheet_unfrozen_pane_ignored() {
        let xml = r#"<worksheet><sheetViews><sheetView>
            <pane xSplit="2" topLeftCell="C1" state="split"/>
        </sheetView></sheetViews></worksheet>"#;
        let content = parse_sheet(xml).unwrap();
        assert_eq!(content.frozen_panes, None);
    }

    #[test]
    fn test_parse_table_prefers_display_name() {
        let xml = r#"<table id="1" name="Table1" displayName="Orders" ref="A1:C10"/>"#;
        let table = parse_table(xml).unwrap().unwrap();
        assert_eq!(table.name, "Orders");
        assert_eq!(table.range, "A1:C10");
    }

    #[test]
    fn test_parse_comments_concatenates_runs() {
        let xml = r#"<comments>
            <authors><author>A</author></authors>
            <commentList>
                <comment ref="B2" authorId="0">
                    <text><r><t>Check </t></r><r><t>this</t></r></text>
                </comment>
            </commentList>
        </comments>"#;
        let comments = parse_comments(xml).unwrap();
        assert_eq!(comments.get("B2").map(|s| s.as_str()), Some("Check this"));
    }

    #[test]
    fn test_attribute_entities_unescape() {
        let xml = r#"<Relationships>
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2"/>
        </Relationships>"#;
        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.get("rId1").unwrap().target, "https://example.com/?a=1&b=2");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("xl", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(
            resolve_target("xl/worksheets", "../tables/table1.xml"),
            "xl/tables/table1.xml"
        );
        assert_eq!(resolve_target("xl/worksheets", "/xl/comments1.xml"), "xl/comments1.xml");
    }
}
