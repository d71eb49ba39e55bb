//! Package writer for fresh OPC packages.
//!
//! This module serializes a set of parts into a ZIP container, writing the
//! `[Content_Types].xml` manifest first, then the package-level relationships,
//! then every part (and its relationships) in the order it was added.

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace, part_name};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use crate::ooxml::opc::rel::{Relationship, rels_to_xml};
use std::collections::BTreeMap;

/// One part queued for writing.
#[derive(Debug, Clone)]
struct PendingPart {
    member: String,
    content_type: String,
    blob: Vec<u8>,
    rels: Option<Vec<Relationship>>,
}

/// Package writer that serializes parts to a ZIP archive in memory.
///
/// # Example
///
/// ```
/// use wordkit::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
/// use wordkit::ooxml::opc::pkgwriter::PackageWriter;
/// use wordkit::ooxml::opc::rel::Relationship;
///
/// let mut writer = PackageWriter::new();
/// writer.add_package_rel(Relationship::new("rId1", rt::OFFICE_DOCUMENT, "word/document.xml"));
/// writer.add_part("word/document.xml", ct::WML_DOCUMENT_MAIN, b"<w:document/>".to_vec());
/// let bytes = writer.to_bytes()?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), wordkit::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct PackageWriter {
    package_rels: Vec<Relationship>,
    parts: Vec<PendingPart>,
}

impl PackageWriter {
    /// Create an empty package writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package-level relationship (written to `_rels/.rels`).
    pub fn add_package_rel(&mut self, rel: Relationship) -> &mut Self {
        self.package_rels.push(rel);
        self
    }

    /// Queue a part with its content type.
    pub fn add_part(&mut self, member: &str, content_type: &str, blob: Vec<u8>) -> &mut Self {
        self.parts.push(PendingPart {
            member: member.trim_start_matches('/').to_string(),
            content_type: content_type.to_string(),
            blob,
            rels: None,
        });
        self
    }

    /// Queue a part together with its own relationships.
    ///
    /// The relationships are written to `<dir>/_rels/<file>.rels` right after
    /// the part, even when the list is empty.
    pub fn add_part_with_rels(
        &mut self,
        member: &str,
        content_type: &str,
        blob: Vec<u8>,
        rels: Vec<Relationship>,
    ) -> &mut Self {
        self.add_part(member, content_type, blob);
        if let Some(part) = self.parts.last_mut() {
            part.rels = Some(rels);
        }
        self
    }

    /// Serialize the queued parts into ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        let content_types = ContentTypesItem::from_parts(&self.parts).to_xml();
        phys_writer.write(part_name::CONTENT_TYPES, content_types.as_bytes())?;

        phys_writer.write(part_name::PACKAGE_RELS, rels_to_xml(&self.package_rels).as_bytes())?;

        for part in &self.parts {
            phys_writer.write(&part.member, &part.blob)?;
            if let Some(ref rels) = part.rels {
                phys_writer.write(&rels_member_for(&part.member), rels_to_xml(rels).as_bytes())?;
            }
        }

        phys_writer.finish()
    }
}

/// Member name of the relationships part belonging to `member`.
///
/// `word/document.xml` maps to `word/_rels/document.xml.rels`.
pub fn rels_member_for(member: &str) -> String {
    match member.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", member),
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_parts(parts: &[PendingPart]) -> Self {
        let mut cti = Self::new();
        for part in parts {
            let ext = part.member.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
            if cti.defaults.get(ext).map(String::as_str) != Some(part.content_type.as_str()) {
                cti.overrides
                    .insert(format!("/{}", part.member), part.content_type.clone());
            }
        }
        cti
    }

    /// Generate the XML for [Content_Types].xml.
    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::opc::phys_pkg::PhysPkgReader;

    #[test]
    fn test_content_types_xml() {
        let parts = vec![PendingPart {
            member: "word/document.xml".to_string(),
            content_type: ct::WML_DOCUMENT_MAIN.to_string(),
            blob: Vec::new(),
            rels: None,
        }];
        let xml = ContentTypesItem::from_parts(&parts).to_xml();

        assert!(xml.contains(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#));
        assert!(xml.contains(r#"<Override PartName="/word/document.xml""#));
    }

    #[test]
    fn test_rels_member_for() {
        assert_eq!(rels_member_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_member_for("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_minimal_package_layout() {
        let mut writer = PackageWriter::new();
        writer.add_package_rel(Relationship::new("rId1", rt::OFFICE_DOCUMENT, "word/document.xml"));
        writer.add_part_with_rels(
            part_name::MAIN_DOCUMENT,
            ct::WML_DOCUMENT_MAIN,
            b"<w:document/>".to_vec(),
            Vec::new(),
        );
        let bytes = writer.to_bytes().unwrap();

        let reader = PhysPkgReader::new(&bytes).unwrap();
        let names: Vec<&str> = reader.member_names().collect();
        assert_eq!(
            names,
            vec![
                part_name::CONTENT_TYPES,
                part_name::PACKAGE_RELS,
                part_name::MAIN_DOCUMENT,
                part_name::MAIN_DOCUMENT_RELS,
            ]
        );
    }
}
