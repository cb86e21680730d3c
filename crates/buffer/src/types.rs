use std::cmp::Ordering;
use std::fmt;

/// Position in the document as (line, byte) where both are 0-indexed.
///
/// `byte` is a UTF-8 byte offset into the line's content. A position is only
/// meaningful relative to a particular [`LineBuffer`](crate::LineBuffer); see
/// [`LineBuffer::is_valid_position`](crate::LineBuffer::is_valid_position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub const ZERO: Position = Position { line: 0, byte: 0 };

    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.line.cmp(&other.line) {
            Ordering::Equal => self.byte.cmp(&other.byte),
            ord => ord,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.byte)
    }
}

/// A half-open range `[lower, upper)` of positions with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    lower: Position,
    upper: Position,
}

impl TextRange {
    /// Creates a range from ordered bounds.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: Position, upper: Position) -> Self {
        assert!(
            lower <= upper,
            "range bounds out of order: {} > {}",
            lower,
            upper
        );
        Self { lower, upper }
    }

    /// Creates the range spanning two positions given in any order.
    pub fn between(a: Position, b: Position) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// An empty range at `position`.
    pub fn point(position: Position) -> Self {
        Self {
            lower: position,
            upper: position,
        }
    }

    pub fn lower(&self) -> Position {
        self.lower
    }

    pub fn upper(&self) -> Position {
        self.upper
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    /// Returns true if both bounds are on the same line.
    pub fn is_single_line(&self) -> bool {
        self.lower.line == self.upper.line
    }

    /// Returns true if `position` lies within `[lower, upper)`.
    pub fn contains(&self, position: Position) -> bool {
        self.lower <= position && position < self.upper
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lower, self.upper)
    }
}

/// Information about which lines were dirtied by a mutation.
/// Consumers use it to limit re-highlighting and redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyLines {
    /// No lines changed (e.g., caret-only movement or a no-op deletion).
    None,
    /// A single line changed.
    Single(usize),
    /// A range of lines changed [from, to).
    Range { from: usize, to: usize },
    /// Everything from a line to the end of the document changed.
    /// Used whenever the line count changes, since every following line shifts.
    FromLineToEnd(usize),
}

impl DirtyLines {
    /// Returns true if no lines were dirtied.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns the starting line of the dirty region, if any.
    pub fn start_line(&self) -> Option<usize> {
        match self {
            DirtyLines::None => None,
            DirtyLines::Single(line) => Some(*line),
            DirtyLines::Range { from, .. } => Some(*from),
            DirtyLines::FromLineToEnd(line) => Some(*line),
        }
    }

    /// Returns true if `line` falls inside the dirty region.
    pub fn contains_line(&self, line: usize) -> bool {
        match *self {
            DirtyLines::None => false,
            DirtyLines::Single(l) => l == line,
            DirtyLines::Range { from, to } => from <= line && line < to,
            DirtyLines::FromLineToEnd(from) => from <= line,
        }
    }

    /// Merges another dirty region into this one, producing the smallest
    /// region that covers both.
    ///
    /// A command that performs several replacements reports each one and
    /// hands the merged region to the consumer once.
    pub fn merge(&mut self, other: DirtyLines) {
        *self = match (*self, other) {
            (DirtyLines::None, _) => other,
            (_, DirtyLines::None) => return,

            (DirtyLines::FromLineToEnd(a), DirtyLines::FromLineToEnd(b)) => {
                DirtyLines::FromLineToEnd(a.min(b))
            }
            (DirtyLines::FromLineToEnd(a), rest) | (rest, DirtyLines::FromLineToEnd(a)) => {
                DirtyLines::FromLineToEnd(rest.start_line().map_or(a, |b| a.min(b)))
            }

            (DirtyLines::Single(a), DirtyLines::Single(b)) => {
                if a == b {
                    DirtyLines::Single(a)
                } else {
                    DirtyLines::Range {
                        from: a.min(b),
                        to: a.max(b) + 1,
                    }
                }
            }

            (DirtyLines::Single(a), DirtyLines::Range { from, to })
            | (DirtyLines::Range { from, to }, DirtyLines::Single(a)) => DirtyLines::Range {
                from: from.min(a),
                to: to.max(a + 1),
            },

            (DirtyLines::Range { from: a, to: b }, DirtyLines::Range { from: c, to: d }) => {
                DirtyLines::Range {
                    from: a.min(c),
                    to: b.max(d),
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Position ordering ====================

    #[test]
    fn test_position_orders_by_line_then_byte() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(
            Position::new(1, 1).cmp(&Position::new(1, 1)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 7).to_string(), "3:7");
    }

    // ==================== TextRange ====================

    #[test]
    fn test_range_between_orders_bounds() {
        let r = TextRange::between(Position::new(4, 1), Position::new(2, 0));
        assert_eq!(r.lower(), Position::new(2, 0));
        assert_eq!(r.upper(), Position::new(4, 1));
        assert!(!r.is_single_line());
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_range_new_rejects_inverted_bounds() {
        TextRange::new(Position::new(1, 0), Position::new(0, 5));
    }

    #[test]
    fn test_range_point_is_empty() {
        let r = TextRange::point(Position::new(1, 2));
        assert!(r.is_empty());
        assert!(!r.contains(Position::new(1, 2)));
    }

    #[test]
    fn test_range_contains_is_half_open() {
        let r = TextRange::new(Position::new(0, 2), Position::new(1, 0));
        assert!(r.contains(Position::new(0, 2)));
        assert!(r.contains(Position::new(0, 40)));
        assert!(!r.contains(Position::new(1, 0)));
    }

    // ==================== Merge: identity ====================

    #[test]
    fn test_merge_none_is_identity() {
        let mut d = DirtyLines::None;
        d.merge(DirtyLines::Single(5));
        assert_eq!(d, DirtyLines::Single(5));

        d.merge(DirtyLines::None);
        assert_eq!(d, DirtyLines::Single(5));
    }

    // ==================== Merge: singles and ranges ====================

    #[test]
    fn test_merge_distinct_singles_becomes_range() {
        let mut d = DirtyLines::Single(10);
        d.merge(DirtyLines::Single(3));
        assert_eq!(d, DirtyLines::Range { from: 3, to: 11 });
    }

    #[test]
    fn test_merge_same_single() {
        let mut d = DirtyLines::Single(3);
        d.merge(DirtyLines::Single(3));
        assert_eq!(d, DirtyLines::Single(3));
    }

    #[test]
    fn test_merge_single_extends_range() {
        let mut d = DirtyLines::Range { from: 5, to: 10 };
        d.merge(DirtyLines::Single(12));
        assert_eq!(d, DirtyLines::Range { from: 5, to: 13 });
    }

    #[test]
    fn test_merge_disjoint_ranges() {
        let mut d = DirtyLines::Range { from: 8, to: 12 };
        d.merge(DirtyLines::Range { from: 3, to: 5 });
        assert_eq!(d, DirtyLines::Range { from: 3, to: 12 });
    }

    // ==================== Merge: FromLineToEnd ====================

    #[test]
    fn test_merge_to_end_absorbs_earlier_single() {
        let mut d = DirtyLines::FromLineToEnd(7);
        d.merge(DirtyLines::Single(2));
        assert_eq!(d, DirtyLines::FromLineToEnd(2));
    }

    #[test]
    fn test_merge_range_into_to_end() {
        let mut d = DirtyLines::Range { from: 9, to: 20 };
        d.merge(DirtyLines::FromLineToEnd(4));
        assert_eq!(d, DirtyLines::FromLineToEnd(4));
    }

    #[test]
    fn test_contains_line() {
        assert!(DirtyLines::FromLineToEnd(3).contains_line(1_000));
        assert!(!DirtyLines::Range { from: 1, to: 3 }.contains_line(3));
        assert!(!DirtyLines::None.contains_line(0));
    }
}
