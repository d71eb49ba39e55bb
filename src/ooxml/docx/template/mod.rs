//! `{{name}}` placeholder templating.
//!
//! Templates are ordinary .docx files whose text contains placeholders such
//! as `{{client.name}}`. Names follow `[A-Za-z_][A-Za-z0-9_.]*`; dots are part
//! of the name and carry no structure. Interior whitespace (`{{ name }}`) is
//! accepted.
//!
//! Applying values runs in three passes over every `word/**.xml` part:
//! discovery on the merged text, repair of placeholders split across runs,
//! then literal substitution of XML-escaped values. Placeholders without a
//! value are reported in [`TemplateOutput::missing`] and stay visible in the
//! output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use wordkit::ooxml::docx::template::{TemplateEngine, TemplateOptions};
//!
//! let bytes = std::fs::read("offer.docx")?;
//! let values = HashMap::from([("name".to_string(), "Alice".to_string())]);
//!
//! let engine = TemplateEngine::with_options(TemplateOptions::default().with_max_run_span(12));
//! let output = engine.apply(&bytes, &values)?;
//! for name in &output.missing {
//!     eprintln!("no value for {{{{{}}}}}", name);
//! }
//! std::fs::write("offer-alice.docx", &output.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod apply;
mod repair;
mod scan;

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default number of consecutive runs a split placeholder may span.
pub const DEFAULT_MAX_RUN_SPAN: usize = 10;

/// Options for [`TemplateEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    /// Maximum number of runs one placeholder may be split across
    pub max_run_span: usize,
    /// Rewrite `{{ name }}` as `{{name}}` before substitution
    pub normalize_whitespace: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            max_run_span: DEFAULT_MAX_RUN_SPAN,
            normalize_whitespace: true,
        }
    }
}

impl TemplateOptions {
    /// Set the run window.
    pub fn with_max_run_span(mut self, span: usize) -> Self {
        self.max_run_span = span;
        self
    }

    /// Enable or disable whitespace normalization.
    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }
}

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Always `true` for discovered placeholders
    pub required: bool,
    /// Always `None` for discovered placeholders
    pub default: Option<String>,
}

impl Variable {
    /// A required variable without default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    /// Attach a default value; the variable is no longer required.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }
}

/// In-memory result of [`TemplateEngine::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateOutput {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Number of substitutions performed
    pub applied: usize,
    /// Placeholders present in the template without a value, sorted
    pub missing: Vec<String>,
}

/// Report of [`apply_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    pub output_path: PathBuf,
    pub applied: usize,
    pub missing_count: usize,
    pub missing: Vec<String>,
}

/// Placeholder engine.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    options: TemplateOptions,
}

impl TemplateEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given options.
    pub fn with_options(options: TemplateOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    #[inline]
    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    /// Substitute `values` into the template `bytes`.
    pub fn apply(&self, bytes: &[u8], values: &HashMap<String, String>) -> Result<TemplateOutput> {
        apply::apply_values(bytes, values, &self.options)
    }

    /// Substitute into the file at `input` and write the result to `output`.
    pub fn apply_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        values: &HashMap<String, String>,
    ) -> Result<ApplyResult> {
        let bytes = std::fs::read(input)?;
        let out = self.apply(&bytes, values)?;
        std::fs::write(output.as_ref(), &out.bytes)?;
        Ok(ApplyResult {
            output_path: output.as_ref().to_path_buf(),
            applied: out.applied,
            missing_count: out.missing.len(),
            missing: out.missing,
        })
    }
}

/// Distinct placeholders of a template, sorted by name.
pub fn extract_variables(bytes: &[u8]) -> Result<Vec<Variable>> {
    Ok(apply::placeholder_set(bytes)?
        .into_iter()
        .map(Variable::new)
        .collect())
}

/// Substitute with default options.
pub fn apply(bytes: &[u8], values: &HashMap<String, String>) -> Result<TemplateOutput> {
    TemplateEngine::new().apply(bytes, values)
}

/// File-level substitution with default options.
pub fn apply_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    values: &HashMap<String, String>,
) -> Result<ApplyResult> {
    TemplateEngine::new().apply_file(input, output, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::ooxml::docx::{Document, Paragraph, Run, parse, write};
    use crate::ooxml::opc::PhysPkgReader;
    use crate::ooxml::opc::constants::part_name;

    fn template(paragraphs: &[&str]) -> Vec<u8> {
        let mut doc = Document::new();
        for text in paragraphs {
            doc.push(Paragraph::new(*text));
        }
        write(&doc).unwrap()
    }

    /// One paragraph whose text is split into the given runs.
    fn fragmented(runs: &[&str]) -> Vec<u8> {
        let runs = runs.iter().map(|text| Run::new(*text)).collect();
        write(&Document::new().with_node(Paragraph::from_runs(runs))).unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn body_xml(bytes: &[u8]) -> String {
        PhysPkgReader::new(bytes)
            .unwrap()
            .read_string(part_name::MAIN_DOCUMENT)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_all_values_applied() {
        let bytes = template(&["Hello {{name}}, welcome to {{company}}!"]);
        let out = apply(&bytes, &values(&[("name", "Alice"), ("company", "Acme")])).unwrap();

        assert_eq!(out.applied, 2);
        assert!(out.missing.is_empty());
        let text = parse(&out.bytes).unwrap().text();
        assert_eq!(text, "Hello Alice, welcome to Acme!");
        assert!(!body_xml(&out.bytes).contains("{{"));
    }

    #[test]
    fn test_missing_values_reported() {
        let bytes = template(&["Hello {{name}}, welcome to {{company}}!"]);
        let out = apply(&bytes, &values(&[("name", "Alice")])).unwrap();

        assert_eq!(out.applied, 1);
        assert_eq!(out.missing, vec!["company"]);
        assert!(parse(&out.bytes).unwrap().text().contains("{{company}}"));
    }

    #[test]
    fn test_values_are_escaped() {
        let bytes = template(&["Counterparty: {{company}}"]);
        let out = apply(&bytes, &values(&[("company", "Smith & Jones <Legal>")])).unwrap();

        assert!(body_xml(&out.bytes).contains("Smith &amp; Jones &lt;Legal&gt;"));
        assert_eq!(
            parse(&out.bytes).unwrap().text(),
            "Counterparty: Smith & Jones <Legal>"
        );
    }

    #[test]
    fn test_extract_variables_dedup_and_sort() {
        let bytes = template(&["{{b}} then {{a}}", "and {{ a }} again"]);
        let vars = extract_variables(&bytes).unwrap();
        assert_eq!(vars, vec![Variable::new("a"), Variable::new("b")]);
        assert!(vars.iter().all(|v| v.required && v.default.is_none()));
    }

    #[test]
    fn test_extract_sees_fragmented_placeholders() {
        let bytes = fragmented(&["Dear {{cli", "ent.na", "me}},"]);
        let vars = extract_variables(&bytes).unwrap();
        assert_eq!(vars, vec![Variable::new("client.name")]);
    }

    #[test]
    fn test_fragmented_placeholders_substituted() {
        for split in 2..=DEFAULT_MAX_RUN_SPAN {
            // Spread "{{customer}}" over exactly `split` runs
            let chars: Vec<String> = "{{customer}}".chars().map(String::from).collect();
            let mut pieces: Vec<String> = chars[..split - 1].to_vec();
            pieces.push(chars[split - 1..].concat());
            let mut runs: Vec<&str> = vec!["To: "];
            runs.extend(pieces.iter().map(String::as_str));
            runs.push(".");

            let out = apply(&fragmented(&runs), &values(&[("customer", "Initech")])).unwrap();
            assert_eq!(out.applied, 1, "split into {} runs", pieces.len());
            assert_eq!(parse(&out.bytes).unwrap().text(), "To: Initech.");
        }
    }

    #[test]
    fn test_fragmentation_beyond_window_is_left_alone() {
        let runs: Vec<String> = "{{abcdefghij}}".chars().map(String::from).collect();
        let runs: Vec<&str> = runs.iter().map(String::as_str).collect();
        let bytes = fragmented(&runs);

        let out = apply(&bytes, &values(&[("abcdefghij", "x")])).unwrap();
        assert_eq!(out.applied, 0);
        assert!(out.missing.is_empty());
        assert_eq!(parse(&out.bytes).unwrap().text(), "{{abcdefghij}}");

        let wide = TemplateEngine::with_options(TemplateOptions::default().with_max_run_span(14));
        let out = wide.apply(&bytes, &values(&[("abcdefghij", "x")])).unwrap();
        assert_eq!(out.applied, 1);
        assert_eq!(parse(&out.bytes).unwrap().text(), "x");
    }

    #[test]
    fn test_interior_whitespace() {
        let bytes = template(&["Dear {{ name }},"]);
        let out = apply(&bytes, &values(&[("name", "Bob")])).unwrap();
        assert_eq!(out.applied, 1);
        assert_eq!(parse(&out.bytes).unwrap().text(), "Dear Bob,");
    }

    #[test]
    fn test_formatting_of_first_fragment_kept() {
        let doc = Document::new().with_node(Paragraph::from_runs(vec![
            Run::new("{{").bold(true),
            Run::new("title"),
            Run::new("}}").italic(true),
        ]));
        let out = apply(&write(&doc).unwrap(), &values(&[("title", "Report")])).unwrap();
        let parsed = parse(&out.bytes).unwrap();
        assert_eq!(parsed.nodes[0].runs(), &[Run::new("Report").bold(true)]);
    }

    #[test]
    fn test_no_placeholders_returns_input() {
        let bytes = template(&["Nothing to fill."]);
        let out = apply(&bytes, &values(&[("x", "y")])).unwrap();
        assert_eq!(out.applied, 0);
        assert_eq!(out.bytes, bytes);
    }

    #[test]
    fn test_invalid_archive() {
        assert!(matches!(extract_variables(b"zip?"), Err(Error::InvalidArchive(_))));
        assert!(matches!(apply(b"zip?", &HashMap::new()), Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_apply_file_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("letter.docx");
        let output = dir.path().join("letter-out.docx");
        std::fs::write(&input, template(&["{{greeting}} {{name}}, re: {{topic}}"])).unwrap();

        let report = apply_file(&input, &output, &values(&[("greeting", "Hi")])).unwrap();
        assert_eq!(report.output_path, output);
        assert_eq!(report.applied, 1);
        assert_eq!(report.missing_count, 2);
        assert_eq!(report.missing, vec!["name", "topic"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["missing_count"], 2);
        assert!(output.exists());
    }
}
