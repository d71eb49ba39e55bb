/// Table serialization.
use super::paragraph::write_paragraph;
use crate::ooxml::docx::model::Table;

/// Append a `w:tbl`; each cell holds one paragraph with the cell text.
pub(crate) fn write_table(xml: &mut String, table: &Table) {
    let columns = table.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);

    xml.push_str("<w:tbl>");
    xml.push_str(r#"<w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
    xml.push_str("<w:tblGrid>");
    for _ in 0..columns {
        xml.push_str("<w:gridCol/>");
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in &row.cells {
            xml.push_str("<w:tc>");
            // A cell must contain at least one paragraph, even when empty
            write_paragraph(xml, cell);
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
}
