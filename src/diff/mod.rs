//! Paragraph-level document diffs.
//!
//! Two documents are compared as sequences of paragraph texts (see
//! [`Document::paragraph_texts`]). The edit script is an exact LCS; changes
//! are grouped into hunks padded with unchanged context and can be rendered
//! as unified diff text.
//!
//! # Example
//!
//! ```rust,no_run
//! use wordkit::diff::diff_documents;
//! use wordkit::ooxml::docx::parse_file;
//!
//! let before = parse_file("contract-v1.docx")?;
//! let after = parse_file("contract-v2.docx")?;
//!
//! let result = diff_documents(&before, &after, 3).with_labels("v1", "v2");
//! println!("+{} -{}", result.insertions, result.deletions);
//! print!("{}", result.to_unified());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod hunk;
mod lcs;
mod render;
mod types;

pub use types::{
    DEFAULT_CONTEXT, DiffLine, DiffLineKind, DiffOp, DiffOptions, DiffResult, Hunk,
};

use crate::ooxml::docx::Document;

/// Diff two paragraph sequences.
///
/// A negative `context` selects [`DEFAULT_CONTEXT`]. Counts cover the whole
/// script, not only what falls inside hunks.
pub fn diff_paragraphs<S: AsRef<str>>(original: &[S], revised: &[S], context: i32) -> DiffResult {
    diff_with_options(original, revised, &DiffOptions::from_context(context))
}

/// Diff two paragraph sequences with explicit options.
pub fn diff_with_options<S: AsRef<str>>(
    original: &[S],
    revised: &[S],
    options: &DiffOptions,
) -> DiffResult {
    let script = lcs::edit_script(original, revised);

    let (mut insertions, mut deletions, mut unchanged) = (0, 0, 0);
    for op in &script {
        match op {
            DiffOp::Equal { .. } => unchanged += 1,
            DiffOp::Delete { .. } => deletions += 1,
            DiffOp::Insert { .. } => insertions += 1,
        }
    }

    let hunks = hunk::build_hunks(&script, original, revised, options.context);
    log::debug!(
        "diff: {} vs {} paragraphs, +{} -{} ={} in {} hunks",
        original.len(),
        revised.len(),
        insertions,
        deletions,
        unchanged,
        hunks.len()
    );

    DiffResult {
        original: "original".to_string(),
        revised: "revised".to_string(),
        insertions,
        deletions,
        unchanged,
        hunks,
    }
}

/// Diff two parsed documents paragraph by paragraph.
pub fn diff_documents(original: &Document, revised: &Document, context: i32) -> DiffResult {
    diff_paragraphs(&original.paragraph_texts(), &revised.paragraph_texts(), context)
}
