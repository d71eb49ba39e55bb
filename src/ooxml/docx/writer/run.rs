/// Run serialization.
use crate::common::xml::escape_xml;
use crate::ooxml::docx::model::Run;

/// Append one `w:r` element for `run`.
///
/// Tabs and line breaks inside the text become `w:tab` and `w:br` so that
/// reading the run back yields the same string.
pub(crate) fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");

    if run.is_formatted() {
        xml.push_str("<w:rPr>");
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if run.italic {
            xml.push_str("<w:i/>");
        }
        xml.push_str("</w:rPr>");
    }

    let mut segment_start = 0;
    for (idx, ch) in run.text.char_indices() {
        let marker = match ch {
            '\t' => "<w:tab/>",
            '\n' => "<w:br/>",
            _ => continue,
        };
        write_text(xml, &run.text[segment_start..idx]);
        xml.push_str(marker);
        segment_start = idx + ch.len_utf8();
    }
    write_text(xml, &run.text[segment_start..]);

    xml.push_str("</w:r>");
}

fn write_text(xml: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    xml.push_str(&escape_xml(text));
    xml.push_str("</w:t>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_run() {
        let mut xml = String::new();
        write_run(&mut xml, &Run::new("a < b"));
        assert_eq!(xml, r#"<w:r><w:t xml:space="preserve">a &lt; b</w:t></w:r>"#);
    }

    #[test]
    fn test_formatted_run_with_tab_and_break() {
        let mut xml = String::new();
        write_run(&mut xml, &Run::new("x\ty\n").bold(true).italic(true));
        assert_eq!(
            xml,
            concat!(
                "<w:r><w:rPr><w:b/><w:i/></w:rPr>",
                r#"<w:t xml:space="preserve">x</w:t><w:tab/>"#,
                r#"<w:t xml:space="preserve">y</w:t><w:br/></w:r>"#
            )
        );
    }
}
