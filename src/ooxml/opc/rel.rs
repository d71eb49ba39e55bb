/// Relationship parts (`.rels`) of an OPC package.
///
/// A relationship links a source (the package itself or one part) to a
/// target part. The engine only needs to read the package-level
/// relationships, to find the main document, and to write the two
/// relationship parts of a freshly built package.
use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::namespace;
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship from a source to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub r_id: String,
    /// Relationship type URI
    pub reltype: String,
    /// Target reference, relative to the source's directory
    pub target_ref: String,
    /// Whether the target lives outside the package
    pub is_external: bool,
}

impl Relationship {
    /// Create a new internal relationship.
    pub fn new(r_id: impl Into<String>, reltype: &str, target_ref: &str) -> Self {
        Self {
            r_id: r_id.into(),
            reltype: reltype.to_string(),
            target_ref: target_ref.to_string(),
            is_external: false,
        }
    }

    /// Resolve the target to a member name, given the directory of the source.
    ///
    /// `base_dir` is `""` for package relationships and e.g. `"word"` for the
    /// relationships of `word/document.xml`. Absolute targets ignore it.
    pub fn target_member(&self, base_dir: &str) -> String {
        let joined = match self.target_ref.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None if base_dir.is_empty() => self.target_ref.clone(),
            None => format!("{}/{}", base_dir.trim_end_matches('/'), self.target_ref),
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    segments.pop();
                },
                other => segments.push(other),
            }
        }
        segments.join("/")
    }
}

/// Parse the content of a `.rels` part.
pub fn parse_rels_xml(rels_xml: &[u8]) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr
                            .unescape_value()
                            .map_err(|err| Error::malformed("Relationship", err))?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value.into_owned()),
                            b"Type" => reltype = Some(value.into_owned()),
                            b"Target" => target_ref = Some(value.into_owned()),
                            b"TargetMode" => is_external = value == "External",
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(reltype), Some(target_ref)) =
                        (r_id, reltype, target_ref)
                    {
                        rels.push(Relationship {
                            r_id,
                            reltype,
                            target_ref,
                            is_external,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::malformed("Relationships", e)),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

/// Serialize relationships to the XML of a `.rels` part, in the given order.
pub fn rels_to_xml(rels: &[Relationship]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<Relationships xmlns=""#);
    xml.push_str(namespace::OPC_RELATIONSHIPS);
    xml.push_str(r#"">"#);

    for rel in rels {
        let target_mode = if rel.is_external {
            r#" TargetMode="External""#
        } else {
            ""
        };

        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
            escape_xml(&rel.r_id),
            escape_xml(&rel.reltype),
            escape_xml(&rel.target_ref),
            target_mode
        ));
    }

    xml.push_str("</Relationships>");
    xml
}
