/// Placeholder discovery and substitution over a package.
use super::repair::repair_part;
use super::scan::{part_text, placeholder_names};
use super::{TemplateOptions, TemplateOutput};
use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use crate::ooxml::opc::PhysPkgReader;
use memchr::memmem;
use std::collections::{BTreeSet, HashMap};

/// A document-tree part read for templating.
struct SourcePart {
    member: String,
    xml: String,
}

fn read_sources(reader: &PhysPkgReader<'_>) -> Result<Vec<SourcePart>> {
    let mut sources = Vec::new();
    for member in reader.document_tree_parts() {
        if let Some(xml) = reader.read_string(&member)? {
            sources.push(SourcePart { member, xml });
        }
    }
    Ok(sources)
}

fn discover(sources: &[SourcePart]) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for source in sources {
        let text = part_text(source.xml.as_bytes())
            .map_err(|e| annotate(e, &source.member))?;
        names.extend(placeholder_names(&text).map(str::to_string));
    }
    Ok(names)
}

/// Prefix the element of a malformed-XML error with the part it came from.
fn annotate(err: Error, member: &str) -> Error {
    match err {
        Error::MalformedXml { element, message } => Error::MalformedXml {
            element,
            message: format!("{}: {}", member, message),
        },
        other => other,
    }
}

/// Distinct placeholder names present in the package, sorted.
pub(crate) fn placeholder_set(bytes: &[u8]) -> Result<BTreeSet<String>> {
    let reader = PhysPkgReader::new(bytes)?;
    discover(&read_sources(&reader)?)
}

/// Discover, repair and substitute.
pub(crate) fn apply_values(
    bytes: &[u8],
    values: &HashMap<String, String>,
    options: &TemplateOptions,
) -> Result<TemplateOutput> {
    let reader = PhysPkgReader::new(bytes)?;
    let sources = read_sources(&reader)?;

    let present = discover(&sources)?;
    let missing: Vec<String> = present
        .iter()
        .filter(|name| !values.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        log::warn!(
            "{} placeholder(s) without a value: {}",
            missing.len(),
            missing.join(", ")
        );
    }

    let mut substitutions: Vec<(String, String)> = values
        .iter()
        .map(|(name, value)| (format!("{{{{{}}}}}", name), escape_xml(value)))
        .collect();
    substitutions.sort_unstable();

    let mut applied = 0;
    let mut replacements: HashMap<String, Vec<u8>> = HashMap::new();

    for source in sources {
        let repaired = repair_part(&source.xml, options).map_err(|e| annotate(e, &source.member))?;
        let mut changed = repaired.is_some();
        let mut xml = repaired.unwrap_or(source.xml);

        for (pattern, value) in &substitutions {
            let count = memmem::find_iter(xml.as_bytes(), pattern.as_bytes()).count();
            if count > 0 {
                xml = xml.replace(pattern.as_str(), value);
                applied += count;
                changed = true;
            }
        }

        if changed {
            log::trace!("templated part {}", source.member);
            replacements.insert(source.member, xml.into_bytes());
        }
    }

    let bytes = if replacements.is_empty() {
        bytes.to_vec()
    } else {
        reader.rewrite(&replacements)?
    };

    Ok(TemplateOutput {
        bytes,
        applied,
        missing,
    })
}
