//! Document writer for DOCX.
//!
//! Turns a [`Document`] into a minimal, valid package: the content-types
//! manifest, the package relationships, the main document part and its
//! (empty) relationships part. Core properties are added only on request.

mod doc;
mod paragraph;
mod run;
pub mod section;
mod table;

pub use section::{PageOrientation, SectionProperties};

use crate::common::Result;
use crate::ooxml::docx::model::Document;
use crate::ooxml::docx::properties::core_properties_xml;
use crate::ooxml::opc::PackageWriter;
use crate::ooxml::opc::constants::{content_type as ct, part_name, relationship_type as rt};
use crate::ooxml::opc::rel::Relationship;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numbering definition id used for list items without their own.
pub const DEFAULT_NUM_ID: &str = "1";

/// Options for [`DocumentWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// `w:numId` for list items that carry no numbering reference
    pub default_num_id: String,
    /// Section properties appended to the body; `None` omits `w:sectPr`
    pub section: Option<SectionProperties>,
    /// Also write `docProps/core.xml` when the metadata is non-empty
    pub include_core_properties: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            default_num_id: DEFAULT_NUM_ID.to_string(),
            section: Some(SectionProperties::default()),
            include_core_properties: false,
        }
    }
}

impl WriterOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback numbering id.
    pub fn with_default_num_id(mut self, num_id: impl Into<String>) -> Self {
        self.default_num_id = num_id.into();
        self
    }

    /// Set the page setup.
    pub fn with_section(mut self, section: SectionProperties) -> Self {
        self.section = Some(section);
        self
    }

    /// Omit the section properties.
    pub fn without_section(mut self) -> Self {
        self.section = None;
        self
    }

    /// Write the document metadata as core properties.
    pub fn with_core_properties(mut self, include: bool) -> Self {
        self.include_core_properties = include;
        self
    }
}

/// Serializes documents into .docx bytes.
///
/// # Examples
///
/// ```rust
/// use wordkit::ooxml::docx::{Document, DocumentWriter, Heading, Paragraph, WriterOptions};
///
/// let doc = Document::new()
///     .with_node(Heading::new(1, "Minutes"))
///     .with_node(Paragraph::new("Attendees: all."));
///
/// let writer = DocumentWriter::with_options(WriterOptions::new().with_default_num_id("3"));
/// let bytes = writer.write(&doc)?;
/// assert_eq!(wordkit::ooxml::docx::parse(&bytes)?.len(), 2);
/// # Ok::<(), wordkit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    options: WriterOptions,
}

impl DocumentWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options.
    pub fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    #[inline]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Serialize `doc` into package bytes.
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut package = PackageWriter::new();
        package.add_package_rel(Relationship::new(
            "rId1",
            rt::OFFICE_DOCUMENT,
            part_name::MAIN_DOCUMENT,
        ));

        let body = doc::document_xml(doc, &self.options);
        package.add_part_with_rels(
            part_name::MAIN_DOCUMENT,
            ct::WML_DOCUMENT_MAIN,
            body.into_bytes(),
            Vec::new(),
        );

        if self.options.include_core_properties && doc.metadata.has_data() {
            package.add_package_rel(Relationship::new(
                "rId2",
                rt::CORE_PROPERTIES,
                part_name::CORE_PROPERTIES,
            ));
            package.add_part(
                part_name::CORE_PROPERTIES,
                ct::OPC_CORE_PROPERTIES,
                core_properties_xml(&doc.metadata).into_bytes(),
            );
        }

        let bytes = package.to_bytes()?;
        log::trace!("wrote {} nodes into {} package bytes", doc.len(), bytes.len());
        Ok(bytes)
    }

    /// Serialize `doc` and write it to `path`.
    pub fn write_file<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        let bytes = self.write(doc)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Serialize `doc` with default options.
pub fn write(doc: &Document) -> Result<Vec<u8>> {
    DocumentWriter::new().write(doc)
}
