/// Main document part (`word/document.xml`) generation.
use super::WriterOptions;
use super::paragraph::{write_heading, write_list_item, write_paragraph};
use super::table::write_table;
use crate::ooxml::docx::model::{Document, Node};
use crate::ooxml::opc::constants::namespace;

/// Serialize the body of `doc` into a complete document part.
pub(crate) fn document_xml(doc: &Document, options: &WriterOptions) -> String {
    let mut xml = String::with_capacity(1024 + doc.len() * 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
        namespace::WML_MAIN,
        namespace::OFC_RELATIONSHIPS
    ));
    xml.push_str("<w:body>");

    for node in &doc.nodes {
        match node {
            Node::Paragraph(p) => write_paragraph(&mut xml, p),
            Node::Heading(h) => write_heading(&mut xml, h),
            Node::ListItem(l) => write_list_item(&mut xml, l, &options.default_num_id),
            Node::Table(t) => write_table(&mut xml, t),
        }
    }

    // The sectPr must be the last element in the body
    if let Some(section) = &options.section {
        section.write_xml(&mut xml);
    }

    xml.push_str("</w:body></w:document>");
    xml
}
