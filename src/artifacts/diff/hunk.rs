//! Grouping of an edit script into unified-diff hunks

use crate::artifacts::diff::diff_algorithm::Edit;

/// Unchanged lines kept around each change
pub const HUNK_CONTEXT: usize = 3;

/// A contiguous slice of the edit script, with the 0-based offsets of its
/// first line on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    a_start: usize,
    b_start: usize,
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Split an edit script into hunks
    ///
    /// Changes separated by at most `2 * HUNK_CONTEXT` unchanged lines share a
    /// hunk; each hunk is padded with up to `HUNK_CONTEXT` unchanged lines on
    /// both ends. A script without changes yields no hunks.
    pub fn filter(edits: &[Edit<T>]) -> Vec<Self> {
        // offsets of each edit on the old and new side
        let mut positions = Vec::with_capacity(edits.len());
        let (mut a_pos, mut b_pos) = (0, 0);
        for edit in edits {
            positions.push((a_pos, b_pos));
            a_pos += edit.in_old() as usize;
            b_pos += edit.in_new() as usize;
        }

        let changes = edits
            .iter()
            .enumerate()
            .filter(|(_, edit)| !edit.is_equal())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let mut hunks = Vec::new();
        let mut changes = changes.into_iter().peekable();

        while let Some(first) = changes.next() {
            let mut last = first;
            while let Some(&next) = changes.peek() {
                if next - last - 1 > 2 * HUNK_CONTEXT {
                    break;
                }
                last = next;
                changes.next();
            }

            let start = first.saturating_sub(HUNK_CONTEXT);
            let end = (last + HUNK_CONTEXT + 1).min(edits.len());
            let (a_start, b_start) = positions[start];

            hunks.push(Hunk {
                a_start,
                b_start,
                edits: edits[start..end].to_vec(),
            });
        }

        hunks
    }
}

impl<T> Hunk<T> {
    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    pub fn a_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.in_old()).count()
    }

    pub fn b_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.in_new()).count()
    }

    /// `@@ -a,b +c,d @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.a_start, self.a_size()),
            format_range(self.b_start, self.b_size())
        )
    }
}

/// Range of a unified hunk header: a single line omits its length, an empty
/// range names the line before it.
fn format_range(start: usize, length: usize) -> String {
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        _ => format!("{},{length}", start + 1),
    }
}
