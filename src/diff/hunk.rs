//! Grouping of an edit script into context-padded hunks.

use super::types::{DiffLine, DiffLineKind, DiffOp, Hunk};
use std::ops::Range;

/// Maximal runs of non-equal operations, as script index ranges.
fn change_regions(script: &[DiffOp]) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut start = None;
    for (index, op) in script.iter().enumerate() {
        match (op.is_equal(), start) {
            (false, None) => start = Some(index),
            (true, Some(s)) => {
                regions.push(s..index);
                start = None;
            },
            _ => {},
        }
    }
    if let Some(s) = start {
        regions.push(s..script.len());
    }
    regions
}

/// Change regions separated by at most `2 * context` equal steps are joined,
/// then each group is padded by `context` on both sides.
fn hunk_ranges(script: &[DiffOp], context: usize) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::new();
    for region in change_regions(script) {
        match merged.last_mut() {
            Some(last) if region.start - last.end <= 2 * context => last.end = region.end,
            _ => merged.push(region),
        }
    }

    merged
        .into_iter()
        .map(|r| r.start.saturating_sub(context)..(r.end + context).min(script.len()))
        .collect()
}

/// Build the hunks of `script` over the two paragraph sequences.
pub(crate) fn build_hunks<S: AsRef<str>>(
    script: &[DiffOp],
    old: &[S],
    new: &[S],
    context: usize,
) -> Vec<Hunk> {
    let ranges = hunk_ranges(script, context);
    let mut hunks = Vec::with_capacity(ranges.len());

    // Lines consumed on each side before the current position
    let mut old_seen = 0usize;
    let mut new_seen = 0usize;
    let mut cursor = 0usize;

    for range in ranges {
        for op in &script[cursor..range.start] {
            old_seen += usize::from(op.advances_old());
            new_seen += usize::from(op.advances_new());
        }

        let old_start = old_seen + 1;
        let new_start = new_seen + 1;
        let mut lines = Vec::with_capacity(range.len());

        for op in &script[range.clone()] {
            let line = match *op {
                DiffOp::Equal { old: o, new: n } => DiffLine {
                    kind: DiffLineKind::Context,
                    content: old[o].as_ref().to_string(),
                    old_line: Some(o + 1),
                    new_line: Some(n + 1),
                },
                DiffOp::Delete { old: o } => DiffLine {
                    kind: DiffLineKind::Delete,
                    content: old[o].as_ref().to_string(),
                    old_line: Some(o + 1),
                    new_line: None,
                },
                DiffOp::Insert { new: n } => DiffLine {
                    kind: DiffLineKind::Insert,
                    content: new[n].as_ref().to_string(),
                    old_line: None,
                    new_line: Some(n + 1),
                },
            };
            old_seen += usize::from(op.advances_old());
            new_seen += usize::from(op.advances_new());
            lines.push(line);
        }
        cursor = range.end;

        let old_count = old_seen + 1 - old_start;
        let new_count = new_seen + 1 - new_start;
        hunks.push(Hunk {
            header: format!(
                "@@ -{},{} +{},{} @@",
                old_start, old_count, new_start, new_count
            ),
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
        });
    }

    hunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::lcs::edit_script;

    fn hunks(old: &[&str], new: &[&str], context: usize) -> Vec<Hunk> {
        build_hunks(&edit_script(old, new), old, new, context)
    }

    #[test]
    fn test_regions() {
        let script = edit_script(&["a", "b", "c", "d"], &["a", "x", "c"]);
        assert_eq!(change_regions(&script), vec![1..3, 4..5]);
    }

    #[test]
    fn test_single_hunk_header() {
        let h = hunks(&["intro", "middle", "end"], &["intro", "end"], 3);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].header, "@@ -1,3 +1,2 @@");
        let kinds: Vec<_> = h[0].lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiffLineKind::Context,
                DiffLineKind::Delete,
                DiffLineKind::Context
            ]
        );
        assert_eq!(h[0].lines[1].old_line, Some(2));
        assert_eq!(h[0].lines[1].new_line, None);
        assert_eq!(h[0].lines[2].new_line, Some(2));
    }

    #[test]
    fn test_distant_changes_split() {
        let old: Vec<String> = (1..=20).map(|i| format!("p{}", i)).collect();
        let mut new = old.clone();
        new[1] = "changed two".into();
        new[17] = "changed eighteen".into();
        let h = build_hunks(&edit_script(&old, &new), &old, &new, 2);

        assert_eq!(h.len(), 2);
        assert_eq!(h[0].old_start, 1);
        assert_eq!(h[0].old_count, 4);
        assert_eq!(h[1].old_start, 16);
        assert_eq!(h[1].old_count, 5);
        assert_eq!(h[1].header, "@@ -16,5 +16,5 @@");
    }

    #[test]
    fn test_close_changes_merge() {
        // Gap of four equal paragraphs fits in 2 * context
        let old = ["a", "b", "c", "d", "e", "f", "g"];
        let new = ["A", "b", "c", "d", "e", "G", "g"];
        let h = hunks(&old, &new, 2);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].old_start, 1);
        assert_eq!(h[0].old_count, 7);

        let h = hunks(&old, &new, 1);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_zero_context() {
        let h = hunks(&["a", "b", "c"], &["a", "c"], 0);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].header, "@@ -2,1 +2,0 @@");
        assert_eq!(h[0].lines.len(), 1);
    }

    #[test]
    fn test_identical_has_no_hunks() {
        assert!(hunks(&["a", "b"], &["a", "b"], 3).is_empty());
    }
}
