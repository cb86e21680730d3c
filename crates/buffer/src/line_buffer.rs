//! The ordered sequence of lines that makes up a document.
//!
//! A [`LineBuffer`] always holds at least one line. It is backed by a
//! persistent tree, so `clone()` is O(1) and is how snapshots are taken: the
//! change log and the undo timeline both keep clones of earlier buffers, and
//! those clones share every untouched node with the live buffer.

use std::fmt;
use std::ops::Range;

use crate::line::{Line, LineKeyAllocator};
use crate::line_tree::{self, LineTree};
use crate::types::Position;

#[derive(Clone)]
pub struct LineBuffer {
    lines: LineTree<Line>,
}

impl LineBuffer {
    /// Creates a buffer holding a single empty line.
    pub fn new(keys: &mut LineKeyAllocator) -> Self {
        Self::from_text("", keys)
    }

    /// Splits `text` on `\n`. A trailing line feed produces a trailing empty
    /// line, and `""` produces one empty line.
    pub fn from_text(text: &str, keys: &mut LineKeyAllocator) -> Self {
        let lines = text.split('\n').map(|s| Line::new(s, keys)).collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Returns the line at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= line_count()`.
    pub fn line(&self, index: usize) -> &Line {
        match self.lines.get(index) {
            Some(line) => line,
            None => panic!(
                "line {} out of bounds for buffer of {} lines",
                index,
                self.line_count()
            ),
        }
    }

    /// Content of the line at `index`. Panics like [`LineBuffer::line`].
    pub fn line_content(&self, index: usize) -> &str {
        self.line(index).content()
    }

    pub fn lines(&self) -> Lines<'_> {
        self.lines_from(0)
    }

    /// Iterates lines starting at `start`.
    pub fn lines_from(&self, start: usize) -> Lines<'_> {
        Lines {
            inner: self.lines.iter_from(start),
        }
    }

    /// Replaces the lines in `range` with `new_lines`.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the end or if the result would hold no
    /// lines.
    pub fn replace_lines(&mut self, range: Range<usize>, new_lines: Vec<Line>) {
        let removed = range.end.saturating_sub(range.start);
        assert!(
            self.line_count() - removed.min(self.line_count()) + new_lines.len() >= 1,
            "a line buffer must keep at least one line"
        );
        self.lines.splice(range, new_lines);
    }

    /// Position just after the last character of the last line.
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line(last).len())
    }

    /// The exclusive document-end bound `(line_count, 0)`.
    ///
    /// Useful as a range limit for consumers; never a valid caret position.
    pub fn end_sentinel(&self) -> Position {
        Position::new(self.line_count(), 0)
    }

    /// Joins all lines with `\n`.
    pub fn export(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.content());
        }
        out
    }

    /// Line contents as owned strings, mostly for tests and shadow copies.
    pub fn to_strings(&self) -> Vec<String> {
        self.lines().map(|l| l.content().to_owned()).collect()
    }

    /// Total UTF-16 length including one unit per line separator.
    pub fn utf16_len(&self) -> usize {
        self.lines().map(Line::utf16_len).sum::<usize>() + self.line_count() - 1
    }
}

impl PartialEq for LineBuffer {
    /// Buffers are equal when their line contents are equal; keys are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.line_count() == other.line_count()
            && self
                .lines()
                .zip(other.lines())
                .all(|(a, b)| a.content() == b.content())
    }
}

impl Eq for LineBuffer {}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.lines().map(Line::content))
            .finish()
    }
}

/// Iterator over the lines of a [`LineBuffer`].
pub struct Lines<'a> {
    inner: line_tree::Iter<'a, Line>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Lines<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> LineBuffer {
        LineBuffer::from_text(text, &mut LineKeyAllocator::new())
    }

    // ==================== Construction ====================

    #[test]
    fn test_new_has_one_empty_line() {
        let buf = LineBuffer::new(&mut LineKeyAllocator::new());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_content(0), "");
        assert_eq!(buf.export(), "");
    }

    #[test]
    fn test_from_text_splits_on_newline() {
        let buf = buffer("a\nbc\n");
        assert_eq!(buf.to_strings(), vec!["a", "bc", ""]);
    }

    #[test]
    fn test_export_round_trips_trailing_newline() {
        let text = "fn main() {\n}\n";
        assert_eq!(buffer(text).export(), text);
    }

    // ==================== Access ====================

    #[test]
    fn test_get_out_of_range() {
        let buf = buffer("one\ntwo");
        assert!(buf.get(1).is_some());
        assert!(buf.get(2).is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_line_out_of_range_panics() {
        buffer("x").line(1);
    }

    #[test]
    fn test_end_position_and_sentinel() {
        let buf = buffer("ab\ncde");
        assert_eq!(buf.end_position(), Position::new(1, 3));
        assert_eq!(buf.end_sentinel(), Position::new(2, 0));
    }

    #[test]
    fn test_lines_from() {
        let buf = buffer("a\nb\nc\nd");
        let tail: Vec<&str> = buf.lines_from(2).map(Line::content).collect();
        assert_eq!(tail, vec!["c", "d"]);
    }

    #[test]
    fn test_utf16_len_counts_separators() {
        assert_eq!(buffer("a😀\nb").utf16_len(), 5);
    }

    // ==================== replace_lines ====================

    #[test]
    fn test_replace_lines_middle() {
        let mut keys = LineKeyAllocator::new();
        let mut buf = LineBuffer::from_text("a\nb\nc", &mut keys);
        buf.replace_lines(1..2, vec![Line::new("x", &mut keys), Line::new("y", &mut keys)]);
        assert_eq!(buf.to_strings(), vec!["a", "x", "y", "c"]);
    }

    #[test]
    #[should_panic(expected = "at least one line")]
    fn test_replace_lines_cannot_empty_buffer() {
        let mut buf = buffer("a\nb");
        buf.replace_lines(0..2, Vec::new());
    }

    // ==================== Snapshots ====================

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut keys = LineKeyAllocator::new();
        let mut buf = LineBuffer::from_text("a\nb", &mut keys);
        let snapshot = buf.clone();
        buf.replace_lines(0..1, vec![Line::new("changed", &mut keys)]);
        assert_eq!(snapshot.to_strings(), vec!["a", "b"]);
        assert_ne!(snapshot, buf);
    }

    #[test]
    fn test_equality_ignores_keys() {
        assert_eq!(buffer("same\ntext"), buffer("same\ntext"));
        assert_ne!(buffer("same"), buffer("same\n"));
    }

    #[test]
    fn test_equality_compares_content_across_allocators() {
        // both buffers hand out key 0 for their only line
        let alpha = buffer("alpha");
        let omega = buffer("omega");
        assert_eq!(alpha.line(0).key(), omega.line(0).key());
        assert_ne!(alpha, omega);
    }
}
