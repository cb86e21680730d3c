//! Position and range queries against a [`LineBuffer`].
//!
//! A position is valid when its line exists, its byte offset is within the
//! line, and the offset lies on a UTF-8 character boundary. The document-end
//! sentinel `(line_count, 0)` is never valid. Queries that take a position as
//! input treat an invalid one as a caller bug and panic.

use std::ops::Range;

use crate::grapheme::{grapheme_boundary_left, grapheme_boundary_right};
use crate::line_buffer::LineBuffer;
use crate::types::{Position, TextRange};

impl LineBuffer {
    pub fn is_valid_position(&self, position: Position) -> bool {
        match self.get(position.line) {
            Some(line) => {
                position.byte <= line.len() && line.content().is_char_boundary(position.byte)
            }
            None => false,
        }
    }

    pub fn is_valid_range(&self, range: TextRange) -> bool {
        self.is_valid_position(range.lower()) && self.is_valid_position(range.upper())
    }

    /// Returns the nearest valid position.
    ///
    /// A line past the end clamps to the document end; a byte past the line
    /// end clamps to the line end; a byte inside a multi-byte character moves
    /// back to that character's start.
    pub fn clamp_to_nearest_valid(&self, position: Position) -> Position {
        let Some(line) = self.get(position.line) else {
            return self.end_position();
        };
        let content = line.content();
        let mut byte = position.byte.min(content.len());
        while !content.is_char_boundary(byte) {
            byte -= 1;
        }
        Position::new(position.line, byte)
    }

    /// The position one grapheme cluster to the left.
    ///
    /// At a line start this is the end of the previous line; at `(0, 0)` it
    /// is `(0, 0)`.
    pub fn left_neighbor(&self, position: Position) -> Position {
        self.assert_valid(position);
        if position.byte > 0 {
            let content = self.line_content(position.line);
            Position::new(position.line, grapheme_boundary_left(content, position.byte))
        } else if position.line > 0 {
            let previous = position.line - 1;
            Position::new(previous, self.line(previous).len())
        } else {
            position
        }
    }

    /// The position one grapheme cluster to the right.
    ///
    /// At a line end this is the start of the next line; at the document end
    /// it is the document end.
    pub fn right_neighbor(&self, position: Position) -> Position {
        self.assert_valid(position);
        let content = self.line_content(position.line);
        if position.byte < content.len() {
            Position::new(position.line, grapheme_boundary_right(content, position.byte))
        } else if position.line + 1 < self.line_count() {
            Position::new(position.line + 1, 0)
        } else {
            position
        }
    }

    /// Lines touched by `range`, from its lower line through its upper line.
    pub fn included_line_range(&self, range: TextRange) -> Range<usize> {
        self.assert_valid_range(range);
        range.lower().line..range.upper().line + 1
    }

    /// Byte subranges of each line covered by `range`.
    ///
    /// The first line is covered from the lower byte, the last line up to the
    /// upper byte, and every line in between completely.
    pub fn line_byte_ranges(&self, range: TextRange) -> Vec<(usize, Range<usize>)> {
        let lines = self.included_line_range(range);
        let (lower, upper) = (range.lower(), range.upper());
        if range.is_single_line() {
            return vec![(lower.line, lower.byte..upper.byte)];
        }
        lines
            .map(|index| {
                let start = if index == lower.line { lower.byte } else { 0 };
                let end = if index == upper.line {
                    upper.byte
                } else {
                    self.line(index).len()
                };
                (index, start..end)
            })
            .collect()
    }

    /// Per-line slices of the text covered by `range`.
    pub fn contents_in(&self, range: TextRange) -> Vec<&str> {
        self.line_byte_ranges(range)
            .into_iter()
            .map(|(index, bytes)| &self.line_content(index)[bytes])
            .collect()
    }

    /// The text covered by `range`, lines joined with `\n`.
    pub fn text_in(&self, range: TextRange) -> String {
        self.contents_in(range).join("\n")
    }

    fn assert_valid(&self, position: Position) {
        assert!(
            self.is_valid_position(position),
            "invalid position {} for buffer of {} lines",
            position,
            self.line_count()
        );
    }

    pub(crate) fn assert_valid_range(&self, range: TextRange) {
        assert!(
            self.is_valid_range(range),
            "invalid range {} for buffer of {} lines",
            range,
            self.line_count()
        );
    }
}
