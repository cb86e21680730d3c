//! A single line of text and its content-identity key.
//!
//! Lines never contain `\n`. Each line caches its character count and its
//! UTF-16 length so that consumers addressing text in either unit can query
//! them in O(1).

use std::fmt;

/// Content-identity key of a line.
///
/// Two lines with the same key are guaranteed to have the same content, so a
/// consumer that cached per-line work (highlighting, layout) can reuse it
/// without comparing strings. A line whose content changes gets a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(u64);

impl LineKey {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`LineKey`]s.
///
/// Owned by the edit engine and passed to every line construction; keys are
/// unique per allocator, never process-wide.
#[derive(Debug, Clone, Default)]
pub struct LineKeyAllocator {
    next: u64,
}

impl LineKeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> LineKey {
        let key = LineKey(self.next);
        self.next += 1;
        key
    }

    /// Number of keys handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

/// One line of the document.
#[derive(Clone)]
pub struct Line {
    content: String,
    char_count: usize,
    utf16_len: usize,
    key: LineKey,
}

impl Line {
    /// Creates a line with a freshly allocated key.
    ///
    /// # Panics
    ///
    /// Panics if `content` contains a line feed.
    pub fn new(content: impl Into<String>, keys: &mut LineKeyAllocator) -> Self {
        let content = content.into();
        assert!(
            !content.contains('\n'),
            "line content must not contain a line feed"
        );
        let (char_count, utf16_len) = content
            .chars()
            .fold((0, 0), |(chars, units), c| (chars + 1, units + c.len_utf16()));
        Self {
            content,
            char_count,
            utf16_len,
            key: keys.allocate(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length of the content in UTF-8 bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn utf16_len(&self) -> usize {
        self.utf16_len
    }

    pub fn key(&self) -> LineKey {
        self.key
    }

    /// Converts a byte offset into a UTF-16 code unit offset.
    ///
    /// Offsets past the end clamp to the line length; offsets inside a
    /// multi-byte character count the whole character as preceding.
    pub fn utf16_offset_of(&self, byte: usize) -> usize {
        let byte = byte.min(self.content.len());
        self.content
            .char_indices()
            .take_while(|(i, _)| *i < byte)
            .map(|(_, c)| c.len_utf16())
            .sum()
    }

    /// Converts a UTF-16 code unit offset into a byte offset.
    ///
    /// Returns `None` if the offset is past the end or splits a surrogate pair.
    pub fn byte_offset_of_utf16(&self, utf16: usize) -> Option<usize> {
        let mut units = 0;
        for (i, c) in self.content.char_indices() {
            if units == utf16 {
                return Some(i);
            }
            if units > utf16 {
                return None;
            }
            units += c.len_utf16();
        }
        (units == utf16).then_some(self.content.len())
    }

    /// Number of characters before `byte`.
    pub fn char_offset_of(&self, byte: usize) -> usize {
        let byte = byte.min(self.content.len());
        self.content
            .char_indices()
            .take_while(|(i, _)| *i < byte)
            .count()
    }

    /// Byte offset of the `chars`-th character, clamped to the line end.
    pub fn byte_offset_of_char(&self, chars: usize) -> usize {
        self.content
            .char_indices()
            .nth(chars)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("key", &self.key)
            .field("content", &self.content)
            .finish()
    }
}
