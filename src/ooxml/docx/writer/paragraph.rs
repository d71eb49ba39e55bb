/// Paragraph serialization for body paragraphs, headings and list items.
use super::run::write_run;
use crate::common::xml::escape_xml;
use crate::ooxml::docx::model::{Heading, ListItem, Paragraph, Run};

/// Paragraph-level properties (`w:pPr`) the writer knows how to emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParagraphProperties<'a> {
    pub style: Option<String>,
    pub numbering: Option<(u32, &'a str)>,
}

impl ParagraphProperties<'_> {
    fn is_empty(&self) -> bool {
        self.style.is_none() && self.numbering.is_none()
    }

    fn write_xml(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:pPr>");
        if let Some(style) = &self.style {
            xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_xml(style)));
        }
        if let Some((ilvl, num_id)) = self.numbering {
            xml.push_str("<w:numPr>");
            xml.push_str(&format!(r#"<w:ilvl w:val="{}"/>"#, ilvl));
            xml.push_str(&format!(r#"<w:numId w:val="{}"/>"#, escape_xml(num_id)));
            xml.push_str("</w:numPr>");
        }
        xml.push_str("</w:pPr>");
    }
}

/// Append a `w:p` with the given properties.
///
/// An empty run list renders the full text as one unformatted run.
pub(crate) fn write_paragraph_xml(
    xml: &mut String,
    properties: &ParagraphProperties<'_>,
    text: &str,
    runs: &[Run],
) {
    xml.push_str("<w:p>");
    properties.write_xml(xml);
    if runs.is_empty() {
        if !text.is_empty() {
            write_run(xml, &Run::new(text));
        }
    } else {
        for run in runs {
            write_run(xml, run);
        }
    }
    xml.push_str("</w:p>");
}

pub(crate) fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    write_paragraph_xml(xml, &ParagraphProperties::default(), &paragraph.text, &paragraph.runs);
}

pub(crate) fn write_heading(xml: &mut String, heading: &Heading) {
    let properties = ParagraphProperties {
        style: Some(format!("Heading{}", heading.level)),
        numbering: None,
    };
    write_paragraph_xml(xml, &properties, &heading.text, &heading.runs);
}

/// Append a list item; items without a numbering reference use
/// `default_num_id`.
pub(crate) fn write_list_item(xml: &mut String, item: &ListItem, default_num_id: &str) {
    let num_id = item
        .list_info
        .as_ref()
        .map(|info| info.num_id.as_str())
        .unwrap_or(default_num_id);
    let properties = ParagraphProperties {
        style: None,
        numbering: Some((item.level, num_id)),
    };
    write_paragraph_xml(xml, &properties, &item.text, &item.runs);
}
