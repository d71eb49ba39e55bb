/// Constant values related to the Open Packaging Convention.
///
/// This module contains content type URIs (like MIME-types) that specify a part's format,
/// XML namespaces, relationship types and the well-known part names of a
/// WordprocessingML package.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // OPC core content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    // WordprocessingML content types
    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

    // Generic XML
    pub const XML: &str = "application/xml";
}

/// XML namespace URIs used in OPC packages
pub mod namespace {
    /// Office relationships namespace
    pub const OFC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// OPC relationships namespace
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    /// WordprocessingML main namespace
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    /// Strict Open XML flavour of [`OFFICE_DOCUMENT`]
    pub const OFFICE_DOCUMENT_STRICT: &str =
        "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";
}

/// Member names of the well-known parts (ZIP entry names, no leading slash)
pub mod part_name {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const PACKAGE_RELS: &str = "_rels/.rels";
    pub const MAIN_DOCUMENT: &str = "word/document.xml";
    pub const MAIN_DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const CORE_PROPERTIES: &str = "docProps/core.xml";

    /// Prefix of the main content tree (document, headers, footers, notes...)
    pub const DOCUMENT_TREE_PREFIX: &str = "word/";
}

/// Whether a member belongs to the main content tree and holds XML.
///
/// Find/replace and placeholder substitution only ever touch these parts;
/// relationship parts (`.rels`) and binary media pass through untouched.
pub fn is_document_tree_xml(member: &str) -> bool {
    member.starts_with(part_name::DOCUMENT_TREE_PREFIX)
        && member
            .len()
            .checked_sub(4)
            .and_then(|start| member.get(start..))
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".xml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_tree_membership() {
        assert!(is_document_tree_xml("word/document.xml"));
        assert!(is_document_tree_xml("word/header1.xml"));
        assert!(is_document_tree_xml("word/glossary/document.XML"));
        assert!(!is_document_tree_xml("word/_rels/document.xml.rels"));
        assert!(!is_document_tree_xml("word/media/image1.png"));
        assert!(!is_document_tree_xml("docProps/core.xml"));
        assert!(!is_document_tree_xml("[Content_Types].xml"));
    }
}
