//! Unified-diff rendering.

use super::types::{DiffLine, DiffResult, Hunk};
use std::fmt;

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.content)
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hunks.is_empty() {
            return Ok(());
        }
        writeln!(f, "--- {}", self.original)?;
        writeln!(f, "+++ {}", self.revised)?;
        for hunk in &self.hunks {
            write!(f, "{}", hunk)?;
        }
        Ok(())
    }
}

impl DiffResult {
    /// Render as unified diff text.
    ///
    /// Identical inputs render as an empty string. Paragraphs containing line
    /// breaks are emitted verbatim after their marker.
    pub fn to_unified(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::diff::diff_paragraphs;

    #[test]
    fn test_unified_text() {
        let result = diff_paragraphs(&["intro", "middle", "end"], &["intro", "end"], 3)
            .with_labels("a.docx", "b.docx");
        assert_eq!(
            result.to_unified(),
            "--- a.docx\n+++ b.docx\n@@ -1,3 +1,2 @@\n intro\n-middle\n end\n"
        );
    }

    #[test]
    fn test_identical_renders_empty() {
        let result = diff_paragraphs(&["same"], &["same"], 3);
        assert_eq!(result.to_unified(), "");
    }

    #[test]
    fn test_insertions_marked() {
        let empty: [&str; 0] = [];
        let text = diff_paragraphs(&empty, &["one", "two"], 3).to_unified();
        assert!(text.contains("@@ -1,0 +1,2 @@\n+one\n+two\n"));
    }
}
