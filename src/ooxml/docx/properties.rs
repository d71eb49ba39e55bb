/// Core properties (`docProps/core.xml`) extraction.
///
/// Core properties follow Dublin Core plus OPC-specific extensions and carry
/// the title, creator, description and timestamps of a document. Reading them
/// is best effort: the caller decides what to do with a failure.
use crate::common::xml::resolve_entity;
use crate::common::{Error, Metadata, Result};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Parse core properties XML into [`Metadata`].
pub fn parse_core_properties(xml: &[u8]) -> Result<Metadata> {
    let mut reader = Reader::from_reader(xml);
    let mut metadata = Metadata::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let element = String::from_utf8_lossy(name.as_ref()).into_owned();
                match e.local_name().as_ref() {
                    b"title" => metadata.title = read_text_element(&mut reader, &element)?,
                    b"subject" => metadata.subject = read_text_element(&mut reader, &element)?,
                    b"creator" => metadata.creator = read_text_element(&mut reader, &element)?,
                    b"keywords" => metadata.keywords = read_text_element(&mut reader, &element)?,
                    b"description" => {
                        metadata.description = read_text_element(&mut reader, &element)?
                    },
                    b"lastModifiedBy" => {
                        metadata.last_modified_by = read_text_element(&mut reader, &element)?
                    },
                    b"created" => {
                        metadata.created = read_text_element(&mut reader, &element)?
                            .and_then(|text| parse_datetime(&text))
                    },
                    b"modified" => {
                        metadata.modified = read_text_element(&mut reader, &element)?
                            .and_then(|text| parse_datetime(&text))
                    },
                    _ => {
                        // Skip unknown elements
                    },
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::malformed("cp:coreProperties", e)),
            _ => {},
        }
        buf.clear();
    }

    Ok(metadata)
}

/// Read the text content of the element that was just opened.
///
/// Text and entity references arrive as separate events; they are joined
/// untrimmed so whitespace next to an entity survives.
fn read_text_element(reader: &mut Reader<&[u8]>, element: &str) -> Result<Option<String>> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::GeneralRef(e)) => {
                let name = String::from_utf8_lossy(e.as_ref());
                if let Some(ch) = resolve_entity(&name) {
                    text.push(ch);
                }
            },
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(Error::malformed(element, e)),
            _ => {},
        }
        buf.clear();
    }

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Parse an ISO 8601 datetime string into a `DateTime<Utc>`.
///
/// Supports formats like:
/// - 2023-10-10T14:30:00Z
/// - 2023-10-10T14:30:00.1234567Z
/// - 2023-10-10T14:30:00
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Serialize metadata into a core properties part.
pub fn core_properties_xml(metadata: &Metadata) -> String {
    use crate::common::xml::escape_xml;

    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));

    let text_fields = [
        ("dc:title", &metadata.title),
        ("dc:subject", &metadata.subject),
        ("dc:creator", &metadata.creator),
        ("cp:keywords", &metadata.keywords),
        ("dc:description", &metadata.description),
        ("cp:lastModifiedBy", &metadata.last_modified_by),
    ];
    for (tag, value) in text_fields {
        if let Some(value) = value {
            xml.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(value)));
        }
    }

    let date_fields = [
        ("dcterms:created", &metadata.created),
        ("dcterms:modified", &metadata.modified),
    ];
    for (tag, value) in date_fields {
        if let Some(value) = value {
            xml.push_str(&format!(
                r#"<{tag} xsi:type="dcterms:W3CDTF">{}</{tag}>"#,
                value.format("%Y-%m-%dT%H:%M:%SZ")
            ));
        }
    }

    xml.push_str("</cp:coreProperties>");
    xml
}
