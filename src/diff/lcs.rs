//! Longest-common-subsequence edit scripts.

use super::types::DiffOp;

/// Optimal edit script turning `old` into `new`.
///
/// Builds the full `(n+1) x (m+1)` LCS table, then backtracks from the
/// bottom-right corner. Equal paragraphs are always taken together; between
/// a deletion and an insertion of equal value the deletion wins. The script
/// is returned left to right.
pub(crate) fn edit_script<S: AsRef<str>>(old: &[S], new: &[S]) -> Vec<DiffOp> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;

    let mut table = vec![0usize; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if old[i - 1].as_ref() == new[j - 1].as_ref() {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1].as_ref() == new[j - 1].as_ref() {
            script.push(DiffOp::Equal {
                old: i - 1,
                new: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if i > 0 && (j == 0 || table[(i - 1) * width + j] >= table[i * width + (j - 1)]) {
            script.push(DiffOp::Delete { old: i - 1 });
            i -= 1;
        } else {
            script.push(DiffOp::Insert { new: j - 1 });
            j -= 1;
        }
    }

    script.reverse();
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_deletion() {
        let script = edit_script(&["intro", "middle", "end"], &["intro", "end"]);
        assert_eq!(
            script,
            vec![
                DiffOp::Equal { old: 0, new: 0 },
                DiffOp::Delete { old: 1 },
                DiffOp::Equal { old: 2, new: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_sides() {
        let empty: [&str; 0] = [];
        assert_eq!(
            edit_script(&empty, &["a", "b"]),
            vec![DiffOp::Insert { new: 0 }, DiffOp::Insert { new: 1 }]
        );
        assert_eq!(
            edit_script(&["a", "b"], &empty),
            vec![DiffOp::Delete { old: 0 }, DiffOp::Delete { old: 1 }]
        );
        assert!(edit_script(&empty, &empty).is_empty());
    }

    #[test]
    fn test_replacement_tie_prefers_deletion_at_the_back() {
        // Backtracking takes the deletion first, so it ends up last
        assert_eq!(
            edit_script(&["x"], &["y"]),
            vec![DiffOp::Insert { new: 0 }, DiffOp::Delete { old: 0 }]
        );
    }

    #[test]
    fn test_lcs_is_optimal() {
        let old = ["a", "b", "c", "a", "b", "b", "a"];
        let new = ["c", "b", "a", "b", "a", "c"];
        let equal = edit_script(&old, &new).iter().filter(|op| op.is_equal()).count();
        assert_eq!(equal, 4);
    }
}
