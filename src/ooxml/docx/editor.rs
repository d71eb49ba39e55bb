/// Literal find/replace over the packaged XML.
///
/// The editor never builds a node tree. It works on the raw XML of every
/// document-tree part (`word/**.xml`), so the replacement keys match the
/// serialized form: a key that should match `&` in the visible text has to
/// be written as `&amp;`. Every other part is raw-copied.
use crate::common::{Error, Result};
use crate::ooxml::opc::PhysPkgReader;
use memchr::memmem::Finder;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Result of a find/replace pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// The rewritten package
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Occurrences found across all parts and keys
    pub total: usize,
    /// Occurrences per touched part, parts without matches omitted
    pub per_part: BTreeMap<String, usize>,
}

impl EditOutcome {
    /// Whether anything was replaced.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.total > 0
    }
}

/// Replace every literal occurrence of each key with its value.
///
/// Occurrences are counted against the original text of each part for every
/// key; the keys are then applied in sorted order, so the output does not
/// depend on map iteration order. Empty keys are ignored. When nothing
/// matches, the input bytes are returned unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use std::collections::HashMap;
///
/// let bytes = std::fs::read("contract.docx")?;
/// let replacements = HashMap::from([("ACME Ltd".to_string(), "Globex plc".to_string())]);
/// let outcome = wordkit::ooxml::docx::edit_bytes(&bytes, &replacements)?;
/// println!("{} replacements", outcome.total);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn edit_bytes(bytes: &[u8], replacements: &HashMap<String, String>) -> Result<EditOutcome> {
    let reader = PhysPkgReader::new(bytes)?;

    let mut pairs: Vec<(&str, &str)> = replacements
        .iter()
        .filter(|(find, _)| !find.is_empty())
        .map(|(find, replace)| (find.as_str(), replace.as_str()))
        .collect();
    pairs.sort_unstable();
    let finders: Vec<Finder<'_>> =
        pairs.iter().map(|(find, _)| Finder::new(find.as_bytes())).collect();

    let mut total = 0;
    let mut per_part = BTreeMap::new();
    let mut rewritten: HashMap<String, Vec<u8>> = HashMap::new();

    for member in reader.document_tree_parts() {
        let Some(blob) = reader.read(&member)? else {
            continue;
        };

        let count: usize = finders.iter().map(|finder| finder.find_iter(&blob).count()).sum();
        if count == 0 {
            continue;
        }

        let mut text = String::from_utf8(blob).map_err(|e| Error::malformed(member.as_str(), e))?;
        for &(find, replace) in &pairs {
            if text.contains(find) {
                text = text.replace(find, replace);
            }
        }

        log::trace!("{}: {} replacements", member, count);
        total += count;
        per_part.insert(member.clone(), count);
        rewritten.insert(member, text.into_bytes());
    }

    let bytes = if rewritten.is_empty() {
        bytes.to_vec()
    } else {
        reader.rewrite(&rewritten)?
    };

    Ok(EditOutcome {
        bytes,
        total,
        per_part,
    })
}

/// Read `input`, replace, and write the result to `output`.
///
/// The output file is written in one go after the whole package has been
/// rebuilt in memory.
pub fn edit_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    replacements: &HashMap<String, String>,
) -> Result<EditOutcome> {
    let bytes = std::fs::read(input)?;
    let outcome = edit_bytes(&bytes, replacements)?;
    std::fs::write(output, &outcome.bytes)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::{Document, Paragraph, parse, write};
    use crate::ooxml::opc::constants::{content_type as ct, part_name, relationship_type as rt};
    use crate::ooxml::opc::{PackageWriter, Relationship};

    fn body(text: &str) -> Vec<u8> {
        format!(
            r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:body></w:document>"#,
            text
        )
        .into_bytes()
    }

    fn fixture() -> Vec<u8> {
        let mut writer = PackageWriter::new();
        writer.add_package_rel(Relationship::new(
            "rId1",
            rt::OFFICE_DOCUMENT,
            part_name::MAIN_DOCUMENT,
        ));
        writer.add_part(
            part_name::MAIN_DOCUMENT,
            ct::WML_DOCUMENT_MAIN,
            body("M365Kit builds M365Kit reports"),
        );
        writer.add_part("word/header1.xml", ct::XML, body("Powered by M365Kit"));
        writer.add_part("docProps/app.xml", ct::XML, b"<Properties>M365Kit</Properties>".to_vec());
        writer.to_bytes().unwrap()
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_across_document_tree() {
        let outcome = edit_bytes(&fixture(), &map(&[("M365Kit", "EditedKit")])).unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.per_part.get(part_name::MAIN_DOCUMENT), Some(&2));
        assert_eq!(outcome.per_part.get("word/header1.xml"), Some(&1));

        let reader = PhysPkgReader::new(&outcome.bytes).unwrap();
        for member in reader.document_tree_parts() {
            let text = reader.read_string(&member).unwrap().unwrap();
            assert!(!text.contains("M365Kit"), "{} still has the old text", member);
        }
        // Outside the document tree nothing changes
        assert_eq!(
            reader.read_string("docProps/app.xml").unwrap().unwrap(),
            "<Properties>M365Kit</Properties>"
        );
        assert_eq!(
            parse(&outcome.bytes).unwrap().nodes[0].text(),
            "EditedKit builds EditedKit reports"
        );
    }

    #[test]
    fn test_zero_matches_is_not_an_error() {
        let input = fixture();
        let outcome = edit_bytes(&input, &map(&[("absent", "x"), ("", "y")])).unwrap();
        assert_eq!(outcome.total, 0);
        assert!(!outcome.is_modified());
        assert!(outcome.per_part.is_empty());
        assert_eq!(outcome.bytes, input);
    }

    #[test]
    fn test_counts_use_original_text_and_sorted_order() {
        // "Kit" also occurs inside "M365Kit"; both are counted on the original
        let outcome =
            edit_bytes(&fixture(), &map(&[("M365Kit", "Suite"), ("Kit", "Box")])).unwrap();
        assert_eq!(outcome.total, 6);

        // "Kit" sorts first, so "M365Kit" has already become "M365Box"
        let doc = parse(&outcome.bytes).unwrap();
        assert_eq!(doc.nodes[0].text(), "M365Box builds M365Box reports");
    }

    #[test]
    fn test_invalid_archive() {
        assert!(matches!(
            edit_bytes(b"nope", &map(&[("a", "b")])),
            Err(Error::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_edit_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        let doc = Document::new().with_node(Paragraph::new("Draft v1"));
        std::fs::write(&input, write(&doc).unwrap()).unwrap();

        let outcome = edit_file(&input, &output, &map(&[("v1", "v2")])).unwrap();
        assert_eq!(outcome.total, 1);
        let edited = parse(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(edited.nodes[0].text(), "Draft v2");
    }
}
