/// Streaming reader for the WordprocessingML body part.
///
/// The reader skips everything up to `<w:body>`, then walks the body's
/// immediate children. Paragraphs become [`Paragraph`], [`Heading`] or
/// [`ListItem`] nodes, tables become [`Table`] nodes, and any other element
/// (section properties, bookmarks, content controls, unknown extensions) is
/// skipped without error.
use crate::common::xml::resolve_entity;
use crate::common::{Error, Result};
use crate::ooxml::docx::model::{
    Heading, ListInfo, ListItem, Node, Paragraph, Run, Table, TableRow,
};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

static HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^heading\s*([1-9])$").expect("valid heading style pattern"));

const UNEXPECTED_EOF: &str = "unexpected end of document";

/// Parse the body part into block nodes.
pub fn parse_body(xml: &[u8]) -> Result<Vec<Node>> {
    let mut reader = Reader::from_reader(xml);
    let mut nodes = Vec::new();

    // Skip everything until the body container opens
    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:document", e))? {
            Event::Start(e) if e.local_name().as_ref() == b"body" => break,
            Event::Empty(e) if e.local_name().as_ref() == b"body" => return Ok(nodes),
            Event::Eof => {
                log::debug!("document part has no body element");
                return Ok(nodes);
            },
            _ => {},
        }
    }

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:body", e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(node) = read_paragraph(&mut reader)?.into_node() {
                        nodes.push(node);
                    }
                },
                b"tbl" => nodes.push(Node::Table(read_table(&mut reader)?)),
                _ => {
                    let name = qualified_name(&e);
                    log::debug!("skipping unsupported body element <{}>", name);
                    skip_element(&mut reader, &name)?;
                },
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::malformed("w:body", UNEXPECTED_EOF)),
            _ => {},
        }
    }

    Ok(nodes)
}

/// Collected state of one `<w:p>` element.
#[derive(Debug, Default)]
struct ParagraphScan {
    style: Option<String>,
    outline_level: Option<u8>,
    num_id: Option<String>,
    ilvl: Option<u32>,
    runs: Vec<Run>,
}

impl ParagraphScan {
    fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Heading level; an explicit outline level wins over the style name.
    fn heading_level(&self) -> Option<u8> {
        if let Some(outline) = self.outline_level {
            return Some(outline.saturating_add(1));
        }
        let style = self.style.as_deref()?;
        HEADING_STYLE
            .captures(style)
            .and_then(|caps| caps.get(1))
            .and_then(|digit| digit.as_str().parse::<u8>().ok())
    }

    fn into_node(self) -> Option<Node> {
        if self.text().trim().is_empty() {
            return None;
        }

        if let Some(level) = self.heading_level() {
            return Some(Node::Heading(Heading::from_runs(level, self.runs)));
        }

        if let Some(num_id) = self.num_id {
            let level = self.ilvl.unwrap_or(0);
            let mut item = ListItem::from_runs(level, self.runs);
            item.list_info = Some(ListInfo { num_id, level });
            return Some(Node::ListItem(item));
        }

        Some(Node::Paragraph(Paragraph::from_runs(self.runs)))
    }
}

/// Read a paragraph whose start tag has just been consumed.
///
/// Runs are collected at any depth, so runs wrapped in hyperlinks, smart
/// tags, insertions or simple fields all contribute. Deleted text
/// (`w:delText`) and field instructions (`w:instrText`) are not `w:t` and
/// therefore never contribute.
///
/// Text boxes (`w:txbxContent`) are separate stories and are skipped, as is
/// the `mc:Fallback` copy of alternate content. A run closes only at the
/// depth it was opened at.
fn read_paragraph(reader: &mut Reader<&[u8]>) -> Result<ParagraphScan> {
    let mut scan = ParagraphScan::default();
    let mut current: Option<Run> = None;
    let mut run_depth = 0usize;
    let mut depth = 1usize;
    let mut in_ppr = false;
    let mut in_rpr = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:p", e))? {
            Event::Start(e) => {
                if matches!(e.local_name().as_ref(), b"txbxContent" | b"Fallback") {
                    skip_element(reader, &qualified_name(&e))?;
                    continue;
                }
                depth += 1;
                match e.local_name().as_ref() {
                    b"r" if current.is_none() => {
                        current = Some(Run::default());
                        run_depth = depth;
                    },
                    b"pPr" => in_ppr = true,
                    b"rPr" => in_rpr = true,
                    b"t" if current.is_some() => in_text = true,
                    _ => apply_property(&e, &mut scan, current.as_mut(), in_ppr, in_rpr)?,
                }
            },
            Event::Empty(e) => apply_property(&e, &mut scan, current.as_mut(), in_ppr, in_rpr)?,
            Event::Text(e) if in_text => {
                if let Some(run) = current.as_mut() {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|err| Error::malformed("w:t", err))?;
                    run.text.push_str(text);
                }
            },
            Event::GeneralRef(e) if in_text => {
                if let Some(run) = current.as_mut() {
                    let name = String::from_utf8_lossy(e.as_ref());
                    match resolve_entity(&name) {
                        Some(ch) => run.text.push(ch),
                        None => {
                            return Err(Error::malformed(
                                "w:t",
                                format!("unknown entity &{};", name),
                            ));
                        },
                    }
                }
            },
            Event::End(e) => {
                let closing = depth;
                depth -= 1;
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"pPr" => in_ppr = false,
                    b"rPr" => in_rpr = false,
                    b"r" if closing == run_depth => {
                        if let Some(run) = current.take()
                            && !run.text.is_empty()
                        {
                            scan.runs.push(run);
                        }
                    },
                    _ => {},
                }
                if depth == 0 {
                    break;
                }
            },
            Event::Eof => return Err(Error::malformed("w:p", UNEXPECTED_EOF)),
            _ => {},
        }
    }

    Ok(scan)
}

/// Apply a property or inline-content element found inside a paragraph.
fn apply_property(
    e: &BytesStart<'_>,
    scan: &mut ParagraphScan,
    run: Option<&mut Run>,
    in_ppr: bool,
    in_rpr: bool,
) -> Result<()> {
    let local = e.local_name();
    match (local.as_ref(), run) {
        (b"b", Some(run)) if in_rpr => run.bold = toggle_value(e)?,
        (b"i", Some(run)) if in_rpr => run.italic = toggle_value(e)?,
        (b"tab", Some(run)) if !in_rpr => run.text.push('\t'),
        (b"br" | b"cr", Some(run)) if !in_rpr => run.text.push('\n'),
        (b"pStyle", None) if in_ppr => scan.style = val_attr(e)?,
        (b"outlineLvl", None) if in_ppr => {
            scan.outline_level = val_attr(e)?.and_then(|v| v.trim().parse::<u8>().ok())
        },
        (b"numId", None) if in_ppr => scan.num_id = val_attr(e)?,
        (b"ilvl", None) if in_ppr => {
            scan.ilvl = val_attr(e)?.and_then(|v| v.trim().parse::<u32>().ok())
        },
        _ => {},
    }
    Ok(())
}

/// Read the `w:val` attribute of an element.
fn val_attr(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::malformed(qualified_name(e), err))?;
        if attr.key.local_name().as_ref() == b"val" {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::malformed(qualified_name(e), err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Interpret an on/off property such as `<w:b/>` or `<w:b w:val="0"/>`.
fn toggle_value(e: &BytesStart<'_>) -> Result<bool> {
    Ok(match val_attr(e)? {
        Some(value) => !matches!(value.as_str(), "0" | "false" | "off"),
        None => true,
    })
}

/// Read a table whose start tag has just been consumed.
fn read_table(reader: &mut Reader<&[u8]>) -> Result<Table> {
    let mut rows = Vec::new();

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:tbl", e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tr" => rows.push(read_row(reader)?),
                _ => skip_element(reader, &qualified_name(&e))?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::malformed("w:tbl", UNEXPECTED_EOF)),
            _ => {},
        }
    }

    Ok(Table::new(rows))
}

fn read_row(reader: &mut Reader<&[u8]>) -> Result<TableRow> {
    let mut row = TableRow::default();

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:tr", e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tc" => row.cells.push(read_cell(reader)?),
                _ => skip_element(reader, &qualified_name(&e))?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::malformed("w:tr", UNEXPECTED_EOF)),
            _ => {},
        }
    }

    Ok(row)
}

/// Read a cell; its text joins the non-empty paragraph texts with newlines.
fn read_cell(reader: &mut Reader<&[u8]>) -> Result<Paragraph> {
    let mut lines: Vec<String> = Vec::new();

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:tc", e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    let text = read_paragraph(reader)?.text();
                    if !text.trim().is_empty() {
                        lines.push(text);
                    }
                },
                b"tbl" => lines.extend(read_table(reader)?.row_texts()),
                _ => skip_element(reader, &qualified_name(&e))?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::malformed("w:tc", UNEXPECTED_EOF)),
            _ => {},
        }
    }

    Ok(Paragraph::new(lines.join("\n")))
}

/// Skip the rest of an element whose start tag has just been consumed.
fn skip_element(reader: &mut Reader<&[u8]>, element: &str) -> Result<()> {
    let mut depth = 1usize;
    loop {
        match reader.read_event().map_err(|e| Error::malformed(element, e))? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            Event::Eof => return Err(Error::malformed(element, UNEXPECTED_EOF)),
            _ => {},
        }
    }
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::model::NodeKind;

    fn body(inner: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
            inner
        )
        .into_bytes()
    }

    #[test]
    fn test_plain_paragraphs_and_empty_ones_dropped() {
        let xml = body(
            r#"<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p>"#,
        );
        let nodes = parse_body(&xml).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text(), "First");
        assert_eq!(nodes[1].text(), "Second");
    }

    #[test]
    fn test_runs_keep_formatting_and_hyperlinks() {
        let xml = body(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Bold </w:t></w:r><w:hyperlink r:id="rId5"><w:r><w:rPr><w:i/><w:b w:val="0"/></w:rPr><w:t>link</w:t></w:r></w:hyperlink><w:r><w:t xml:space="preserve"> &amp; more</w:t></w:r></w:p>"#,
        );
        let nodes = parse_body(&xml).unwrap();
        let Node::Paragraph(para) = &nodes[0] else {
            panic!("expected paragraph, got {:?}", nodes[0]);
        };
        assert_eq!(para.text, "Bold link & more");
        assert_eq!(para.runs.len(), 3);
        assert!(para.runs[0].bold && !para.runs[0].italic);
        assert!(!para.runs[1].bold && para.runs[1].italic);
        assert!(!para.runs[2].is_formatted());
    }

    #[test]
    fn test_heading_detection() {
        let xml = body(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>By style</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:r><w:t>By outline</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Heading3"/><w:outlineLvl w:val="4"/></w:pPr><w:r><w:t>Both</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="HeadingNote"/></w:pPr><w:r><w:t>Not a heading</w:t></w:r></w:p>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        let levels: Vec<Option<u8>> = nodes
            .iter()
            .map(|n| match n {
                Node::Heading(h) => Some(h.level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![Some(2), Some(1), Some(5), None]);
    }

    #[test]
    fn test_list_items() {
        let xml = body(concat!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>nested</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:numPr><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>top</w:t></w:r></w:p>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        let Node::ListItem(nested) = &nodes[0] else {
            panic!("expected list item");
        };
        assert_eq!(nested.level, 1);
        assert_eq!(
            nested.list_info,
            Some(ListInfo {
                num_id: "7".to_string(),
                level: 1
            })
        );
        let Node::ListItem(top) = &nodes[1] else {
            panic!("expected list item");
        };
        assert_eq!(top.level, 0);
    }

    #[test]
    fn test_tables() {
        let xml = body(concat!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid>"#,
            r#"<w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>line 1</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>line 2</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"<w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"</w:tbl>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        assert_eq!(nodes.len(), 1);
        let Node::Table(table) = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0].text, "Name");
        assert_eq!(table.rows[0].cells[1].text, "line 1\nline 2");
        assert_eq!(table.rows[1].cells[0].text, "");
    }

    #[test]
    fn test_unknown_elements_skipped() {
        let xml = body(concat!(
            r#"<w:bookmarkStart w:id="0" w:name="_GoBack"/>"#,
            r#"<w:sdt><w:sdtContent><w:p><w:r><w:t>inside control</w:t></w:r></w:p></w:sdtContent></w:sdt>"#,
            r#"<x:future xmlns:x="urn:x"><x:thing/></x:future>"#,
            r#"<w:p><w:r><w:t>kept</w:t></w:r></w:p>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_tabs_breaks_and_deleted_text() {
        let xml = body(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/></w:r><w:del><w:r><w:delText>gone</w:delText></w:r></w:del><w:r><w:instrText> PAGE </w:instrText></w:r></w:p>"#,
        );
        let nodes = parse_body(&xml).unwrap();
        assert_eq!(nodes[0].text(), "a\tb\n");
    }

    #[test]
    fn test_text_box_content_skipped() {
        let xml = body(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Before </w:t></w:r>"#,
            r#"<w:r><mc:AlternateContent xmlns:mc="urn:mc">"#,
            r#"<mc:Choice Requires="wps"><w:drawing><wps:wsp xmlns:wps="urn:wps"><wps:txbx>"#,
            r#"<w:txbxContent><w:p><w:r><w:t>BOX</w:t></w:r></w:p></w:txbxContent>"#,
            r#"</wps:txbx></wps:wsp></w:drawing></mc:Choice>"#,
            r#"<mc:Fallback><w:pict><v:shape xmlns:v="urn:v"><v:textbox>"#,
            r#"<w:txbxContent><w:p><w:r><w:t>BOX</w:t></w:r></w:p></w:txbxContent>"#,
            r#"</v:textbox></v:shape></w:pict></mc:Fallback></mc:AlternateContent>"#,
            r#"<w:t>mid</w:t></w:r>"#,
            r#"<w:r><w:t xml:space="preserve"> after</w:t></w:r></w:p>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text(), "Before mid after");
    }

    #[test]
    fn test_nested_run_does_not_close_outer_run() {
        let xml = body(concat!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>outer</w:t>"#,
            r#"<w:ruby><w:rt><w:r><w:t>ann</w:t></w:r></w:rt></w:ruby>"#,
            r#"<w:t xml:space="preserve"> tail</w:t></w:r></w:p>"#,
        ));
        let nodes = parse_body(&xml).unwrap();
        let Node::Paragraph(para) = &nodes[0] else {
            panic!("expected paragraph, got {:?}", nodes[0]);
        };
        assert_eq!(para.runs.len(), 1);
        assert!(para.runs[0].bold);
        assert_eq!(para.text, "outerann tail");
    }

    #[test]
    fn test_malformed_reports_element() {
        let xml = br#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>oops</w:r></w:p></w:body></w:document>"#;
        match parse_body(xml) {
            Err(Error::MalformedXml { element, .. }) => assert_eq!(element, "w:p"),
            other => panic!("expected malformed XML error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_body() {
        let xml = br#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>cut"#;
        assert!(matches!(parse_body(xml), Err(Error::MalformedXml { .. })));
    }

    #[test]
    fn test_missing_body_yields_no_nodes() {
        let xml = br#"<w:document xmlns:w="urn:w"></w:document>"#;
        assert!(parse_body(xml).unwrap().is_empty());
    }
}
