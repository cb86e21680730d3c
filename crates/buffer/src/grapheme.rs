//! Grapheme cluster boundary detection over byte offsets.
//!
//! A grapheme cluster is what users perceive as a single character: ZWJ emoji
//! sequences, a base letter plus combining marks, regional indicator pairs,
//! Hangul jamo sequences. Lines are stored as UTF-8 and addressed by byte, but
//! caret movement and deletion step over whole clusters.

use unicode_segmentation::UnicodeSegmentation;

/// Returns the byte offset of the grapheme boundary immediately before `byte`.
///
/// Returns 0 at the start of the line. If `byte` falls inside a cluster, the
/// start of that cluster is returned.
pub fn grapheme_boundary_left(line: &str, byte: usize) -> usize {
    if byte == 0 || line.is_empty() {
        return 0;
    }
    let byte = byte.min(line.len());

    // Fast path: an ASCII byte before the caret is a whole cluster unless a
    // combining mark follows it.
    let bytes = line.as_bytes();
    if bytes[byte - 1].is_ascii() && (byte == line.len() || bytes[byte].is_ascii()) {
        return byte - 1;
    }

    let mut result = 0;
    for (start, _) in line.grapheme_indices(true) {
        if start < byte {
            result = start;
        } else {
            break;
        }
    }
    result
}

/// Returns the byte offset of the grapheme boundary immediately after `byte`.
///
/// Returns `line.len()` at or past the end of the line.
pub fn grapheme_boundary_right(line: &str, byte: usize) -> usize {
    if byte >= line.len() {
        return line.len();
    }

    let bytes = line.as_bytes();
    if bytes[byte].is_ascii() && (byte + 1 == line.len() || bytes[byte + 1].is_ascii()) {
        return byte + 1;
    }

    for (start, grapheme) in line.grapheme_indices(true) {
        let end = start + grapheme.len();
        if byte < end {
            return end;
        }
    }
    line.len()
}

/// Returns true if `byte` lies on a grapheme cluster boundary.
pub fn is_grapheme_boundary(line: &str, byte: usize) -> bool {
    if byte == 0 || byte == line.len() {
        return true;
    }
    if byte > line.len() || !line.is_char_boundary(byte) {
        return false;
    }
    line.grapheme_indices(true).any(|(start, _)| start == byte)
}

/// Byte length of the cluster ending at `byte`, or 0 at the line start.
pub fn grapheme_len_before(line: &str, byte: usize) -> usize {
    let byte = byte.min(line.len());
    byte - grapheme_boundary_left(line, byte)
}

/// Byte length of the cluster starting at `byte`, or 0 at the line end.
pub fn grapheme_len_at(line: &str, byte: usize) -> usize {
    grapheme_boundary_right(line, byte) - byte.min(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== grapheme_boundary_left ====================

    #[test]
    fn test_left_at_start() {
        assert_eq!(grapheme_boundary_left("hello", 0), 0);
        assert_eq!(grapheme_boundary_left("", 3), 0);
    }

    #[test]
    fn test_left_ascii() {
        assert_eq!(grapheme_boundary_left("hello", 5), 4);
        assert_eq!(grapheme_boundary_left("hello", 1), 0);
    }

    #[test]
    fn test_left_emoji() {
        // "a😀" = 1 + 4 bytes
        assert_eq!(grapheme_boundary_left("a😀", 5), 1);
    }

    #[test]
    fn test_left_combining_mark() {
        // "e\u{301}" is one cluster of 3 bytes
        assert_eq!(grapheme_boundary_left("xe\u{301}", 4), 1);
    }

    #[test]
    fn test_left_zwj_sequence() {
        let family = "👨\u{200D}👩\u{200D}👧";
        let line = format!("a{}b", family);
        assert_eq!(grapheme_boundary_left(&line, 1 + family.len()), 1);
    }

    #[test]
    fn test_left_regional_indicators() {
        let flag = "🇺🇸";
        assert_eq!(grapheme_boundary_left(flag, flag.len()), 0);
    }

    // ==================== grapheme_boundary_right ====================

    #[test]
    fn test_right_at_end() {
        assert_eq!(grapheme_boundary_right("abc", 3), 3);
        assert_eq!(grapheme_boundary_right("abc", 9), 3);
    }

    #[test]
    fn test_right_ascii() {
        assert_eq!(grapheme_boundary_right("abc", 0), 1);
    }

    #[test]
    fn test_right_ascii_followed_by_combining_mark() {
        assert_eq!(grapheme_boundary_right("e\u{301}x", 0), 3);
    }

    #[test]
    fn test_right_multibyte() {
        assert_eq!(grapheme_boundary_right("é😀", 0), 2);
        assert_eq!(grapheme_boundary_right("é😀", 2), 6);
    }

    // ==================== boundary queries ====================

    #[test]
    fn test_is_grapheme_boundary() {
        let line = "ae\u{301}b";
        assert!(is_grapheme_boundary(line, 0));
        assert!(is_grapheme_boundary(line, 1));
        assert!(!is_grapheme_boundary(line, 2));
        assert!(!is_grapheme_boundary(line, 3));
        assert!(is_grapheme_boundary(line, 4));
        assert!(is_grapheme_boundary(line, 5));
        assert!(!is_grapheme_boundary(line, 6));
    }

    #[test]
    fn test_grapheme_lengths() {
        let line = "a😀";
        assert_eq!(grapheme_len_before(line, 5), 4);
        assert_eq!(grapheme_len_before(line, 0), 0);
        assert_eq!(grapheme_len_at(line, 1), 4);
        assert_eq!(grapheme_len_at(line, 5), 0);
    }
}
