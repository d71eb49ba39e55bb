/// Package implementation for Word documents.
use crate::common::{Error, Metadata, Result};
use crate::ooxml::docx::model::Document;
use crate::ooxml::docx::properties::parse_core_properties;
use crate::ooxml::docx::reader::parse_body;
use crate::ooxml::opc::constants::{part_name, relationship_type as rt};
use crate::ooxml::opc::rel::{Relationship, parse_rels_xml};
use crate::ooxml::opc::PhysPkgReader;
use std::path::Path;

/// A Word (.docx) package.
///
/// This is the main entry point for reading Word documents. The package owns
/// the archive bytes and remembers which member holds the document body.
///
/// # Examples
///
/// ```rust,no_run
/// use wordkit::ooxml::docx::Package;
///
/// let pkg = Package::open("document.docx")?;
/// let doc = pkg.document()?;
/// println!("{}", doc.text());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    data: Vec<u8>,
    main_document: String,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_vec(std::fs::read(path)?)
    }

    /// Create a package from a byte slice; the bytes are copied.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_vec(data.to_vec())
    }

    /// Create a package that takes ownership of the archive bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArchive`] for non-zip input and
    /// [`Error::MissingBodyPart`] when no main document part can be found.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        let main_document = {
            let reader = PhysPkgReader::new(&data)?;
            let rels = package_rels(&reader);
            resolve_main_document(&reader, &rels)?
        };
        Ok(Self {
            data,
            main_document,
        })
    }

    /// Member name of the main document part, e.g. `word/document.xml`.
    #[inline]
    pub fn main_document_name(&self) -> &str {
        &self.main_document
    }

    /// Raw archive bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Physical reader over the archive.
    pub fn phys_reader(&self) -> Result<PhysPkgReader<'_>> {
        PhysPkgReader::new(&self.data)
    }

    /// Core properties of the package; empty when absent or unreadable.
    pub fn metadata(&self) -> Result<Metadata> {
        let reader = self.phys_reader()?;
        Ok(read_metadata(&reader, &package_rels(&reader)))
    }

    /// Parse the document body and core properties.
    pub fn document(&self) -> Result<Document> {
        let reader = self.phys_reader()?;
        let rels = package_rels(&reader);
        read_document(&reader, &self.main_document, &rels)
    }
}

/// Parse .docx bytes into a [`Document`].
///
/// # Examples
///
/// ```rust,no_run
/// let bytes = std::fs::read("report.docx")?;
/// let doc = wordkit::ooxml::docx::parse(&bytes)?;
/// for text in doc.paragraph_texts() {
///     println!("{}", text);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(bytes: &[u8]) -> Result<Document> {
    let reader = PhysPkgReader::new(bytes)?;
    let rels = package_rels(&reader);
    let main_document = resolve_main_document(&reader, &rels)?;
    read_document(&reader, &main_document, &rels)
}

/// Parse a .docx file into a [`Document`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse(&std::fs::read(path)?)
}

fn read_document(
    reader: &PhysPkgReader<'_>,
    main_document: &str,
    rels: &[Relationship],
) -> Result<Document> {
    let metadata = read_metadata(reader, rels);
    let body = reader
        .read(main_document)?
        .ok_or_else(|| Error::MissingBodyPart(main_document.to_string()))?;
    let nodes = parse_body(&body)?;
    log::trace!("parsed {} body nodes from {}", nodes.len(), main_document);
    Ok(Document { nodes, metadata })
}

/// Package-level relationships; unreadable relationship parts yield none.
fn package_rels(reader: &PhysPkgReader<'_>) -> Vec<Relationship> {
    let xml = match reader.read(part_name::PACKAGE_RELS) {
        Ok(Some(xml)) => xml,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::debug!("cannot read {}: {}", part_name::PACKAGE_RELS, e);
            return Vec::new();
        },
    };
    parse_rels_xml(&xml).unwrap_or_else(|e| {
        log::debug!("ignoring malformed {}: {}", part_name::PACKAGE_RELS, e);
        Vec::new()
    })
}

fn target_of(rels: &[Relationship], reltypes: &[&str]) -> Option<String> {
    rels.iter()
        .find(|rel| !rel.is_external && reltypes.contains(&rel.reltype.as_str()))
        .map(|rel| rel.target_member(""))
}

/// Locate the body part through the `officeDocument` relationship, falling
/// back to the conventional member name.
fn resolve_main_document(reader: &PhysPkgReader<'_>, rels: &[Relationship]) -> Result<String> {
    let target = target_of(rels, &[rt::OFFICE_DOCUMENT, rt::OFFICE_DOCUMENT_STRICT]);
    if let Some(member) = &target {
        if reader.contains(member) {
            return Ok(member.clone());
        }
        log::debug!("officeDocument target {} is missing from the package", member);
    }

    if reader.contains(part_name::MAIN_DOCUMENT) {
        Ok(part_name::MAIN_DOCUMENT.to_string())
    } else {
        Err(Error::MissingBodyPart(
            target.unwrap_or_else(|| part_name::MAIN_DOCUMENT.to_string()),
        ))
    }
}

fn read_metadata(reader: &PhysPkgReader<'_>, rels: &[Relationship]) -> Metadata {
    let member = target_of(rels, &[rt::CORE_PROPERTIES])
        .unwrap_or_else(|| part_name::CORE_PROPERTIES.to_string());

    match reader.read(&member) {
        Ok(Some(xml)) => parse_core_properties(&xml).unwrap_or_else(|e| {
            log::debug!("ignoring malformed core properties in {}: {}", member, e);
            Metadata::default()
        }),
        Ok(None) => Metadata::default(),
        Err(e) => {
            log::debug!("cannot read core properties {}: {}", member, e);
            Metadata::default()
        },
    }
}
