//! Diff result types.

use serde::{Deserialize, Serialize};

/// Context lines used when none (or a negative count) is given.
pub const DEFAULT_CONTEXT: usize = 3;

/// Options for paragraph diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Unchanged paragraphs shown around each change
    pub context: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
        }
    }
}

impl DiffOptions {
    /// Options from a signed context count; negative counts mean the default.
    pub fn from_context(context: i32) -> Self {
        Self {
            context: usize::try_from(context).unwrap_or(DEFAULT_CONTEXT),
        }
    }

    /// Set the context size.
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }
}

/// One step of an edit script, with 0-based indices into the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffOp {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

impl DiffOp {
    #[inline]
    pub fn is_equal(&self) -> bool {
        matches!(self, DiffOp::Equal { .. })
    }

    /// Whether the step consumes a line of the original.
    #[inline]
    pub(crate) fn advances_old(&self) -> bool {
        !matches!(self, DiffOp::Insert { .. })
    }

    /// Whether the step consumes a line of the revision.
    #[inline]
    pub(crate) fn advances_new(&self) -> bool {
        !matches!(self, DiffOp::Delete { .. })
    }
}

/// Kind of a line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineKind {
    Context,
    Delete,
    Insert,
}

impl DiffLineKind {
    /// Unified-diff line prefix.
    pub fn marker(&self) -> char {
        match self {
            DiffLineKind::Context => ' ',
            DiffLineKind::Delete => '-',
            DiffLineKind::Insert => '+',
        }
    }
}

/// One paragraph inside a hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
    /// 1-based position in the original, for context and deleted lines
    pub old_line: Option<usize>,
    /// 1-based position in the revision, for context and inserted lines
    pub new_line: Option<usize>,
}

/// A contiguous group of changes padded with context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// `@@ -{old_start},{old_count} +{new_start},{new_count} @@`
    pub header: String,
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// Paragraph-level comparison of two documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Label of the original side
    pub original: String,
    /// Label of the revised side
    pub revised: String,
    pub insertions: usize,
    pub deletions: usize,
    pub unchanged: usize,
    pub hunks: Vec<Hunk>,
}

impl DiffResult {
    /// Replace the side labels used by [`DiffResult::to_unified`].
    pub fn with_labels(mut self, original: impl Into<String>, revised: impl Into<String>) -> Self {
        self.original = original.into();
        self.revised = revised.into();
        self
    }

    /// Whether the two sides differ.
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.insertions > 0 || self.deletions > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_context_means_default() {
        assert_eq!(DiffOptions::from_context(-1).context, DEFAULT_CONTEXT);
        assert_eq!(DiffOptions::from_context(0).context, 0);
        assert_eq!(DiffOptions::from_context(7).context, 7);
    }

    #[test]
    fn test_op_sides() {
        assert!(DiffOp::Equal { old: 0, new: 0 }.advances_old());
        assert!(DiffOp::Equal { old: 0, new: 0 }.advances_new());
        assert!(!DiffOp::Insert { new: 0 }.advances_old());
        assert!(!DiffOp::Delete { old: 0 }.advances_new());
    }
}
