//! Document snapshot implementation using a rope data structure.
//!
//! ## Why Rope?
//!
//! Fragment scanning reads the document line by line and slices arbitrary
//! char ranges out of it on every rebuild. Ropes keep both operations at
//! O(log n) regardless of where in a large note the fragment sits:
//! - **Line lookup**: `char_to_line` / `line_to_char` are tree walks
//! - **Slicing**: a slice borrows chunks instead of copying the whole text
//! - **Edits**: hosts can apply keystrokes without rebuilding the snapshot
//!
//! ## Learning: Ownership in Action
//!
//! ```rust,ignore
//! let buffer = TextBuffer::from("<% x %>");  // buffer OWNS the rope
//! let fragment = buffer.slice(0..7)?;       // fragment BORROWS from buffer
//! // buffer.insert(0, "y");                 // ERROR! Can't mutate while borrowed
//! drop(fragment);                           // Release borrow
//! buffer.insert(0, "y")?;                   // Now OK!
//! ```

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

use crate::{BufferError, BufferResult};

/// A document snapshot backed by a rope data structure.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync` in spirit: hosts hand a shared
/// reference to the rebuild pipeline and only mutate between rebuilds.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use templight_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Loads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from(content.as_str()))
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its line break.
    pub fn line(&self, line_idx: usize) -> BufferResult<Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line_idx));
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Iterates over every line in order, line breaks included.
    ///
    /// Summing the char length of each yielded line gives the running offset
    /// of the next line's start.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            inner: self.rope.lines(),
        }
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    // ==================== Coordinates ====================

    /// Returns the line containing a char offset.
    ///
    /// The offset one past the last char is accepted and maps to the last line.
    pub fn char_to_line(&self, char_idx: usize) -> BufferResult<usize> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        Ok(self.rope.char_to_line(char_idx))
    }

    /// Returns the char offset where a line starts.
    pub fn line_to_char(&self, line_idx: usize) -> BufferResult<usize> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line_idx));
        }
        Ok(self.rope.line_to_char(line_idx))
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    ///
    /// # Learning: `&mut self`
    ///
    /// This method requires exclusive (mutable) access to the buffer.
    /// The borrow checker guarantees no rebuild is reading the snapshot
    /// while it changes.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Deletes text in a character range and returns it.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        let deleted = self.slice(range.clone())?.into_owned();
        self.rope.remove(range);
        Ok(deleted)
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

/// Iterator over the lines of a [`TextBuffer`].
pub struct Lines<'a> {
    inner: ropey::iter::Lines<'a>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Cow::from)
    }
}
