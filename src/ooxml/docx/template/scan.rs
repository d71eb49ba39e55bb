/// Placeholder detection.
///
/// Detection works on the merged text of a part: the contents of every
/// `w:t` element, concatenated without regard to run or paragraph
/// boundaries. That text is used only to find names, never for output.
use crate::common::xml::resolve_entity;
use crate::common::{Error, Result};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

/// `{{name}}` with optional interior whitespace; group 1 is the name.
pub(crate) static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}").expect("valid placeholder pattern")
});

/// Concatenated `w:t` text of one part.
pub(crate) fn part_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| Error::malformed("w:t", e))? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) if e.local_name().as_ref() == b"t" => in_text = false,
            Event::Text(e) if in_text => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) if in_text => {
                if let Some(ch) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                    text.push(ch);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(text)
}

/// Placeholder names in `text`, in order of appearance, duplicates kept.
pub(crate) fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Rewrite `{{ name }}` as `{{name}}`, borrowing when nothing changes.
pub(crate) fn normalize_placeholders(text: &str) -> std::borrow::Cow<'_, str> {
    PLACEHOLDER.replace_all(text, "{{$1}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern() {
        let names: Vec<&str> =
            placeholder_names("{{a}} {{ b.c }} {{_x1}} {{1bad}} {{no-dash}} {single}").collect();
        assert_eq!(names, vec!["a", "b.c", "_x1"]);
    }

    #[test]
    fn test_part_text_ignores_run_boundaries() {
        let xml = br#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>{{</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>na</w:t></w:r><w:r><w:t>me}} &amp;</w:t></w:r></w:p><w:p><w:r><w:instrText>{{field}}</w:instrText></w:r></w:p></w:body></w:document>"#;
        let text = part_text(xml).unwrap();
        assert_eq!(text, "{{name}} &");
        assert_eq!(placeholder_names(&text).collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_placeholders("Dear {{  name }},"), "Dear {{name}},");
        assert!(matches!(
            normalize_placeholders("no placeholders"),
            std::borrow::Cow::Borrowed(_)
        ));
    }
}
