//! Opening and closing fragment markers.
//!
//! Both markers are regular expressions searched independently inside a
//! single line, so neither can span a line break.

use std::ops::Range;

use regex::Regex;

use crate::SyntaxError;

/// Compiled opening/closing marker patterns.
#[derive(Debug, Clone)]
pub struct Delimiters {
    open: Regex,
    close: Regex,
}

impl Delimiters {
    /// `<%` with an optional `*` marking the raw variant.
    pub const DEFAULT_OPEN: &'static str = r"<%\*?";
    pub const DEFAULT_CLOSE: &'static str = r"%>";

    /// Compiles a pair of marker patterns.
    ///
    /// Patterns that can match the empty string are rejected: an empty
    /// marker would pair with every position in the document.
    pub fn new(open: &str, close: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            open: compile(open)?,
            close: compile(close)?,
        })
    }

    /// Finds the first opening marker at or after byte `at` of `line`.
    pub fn find_open(&self, line: &str, at: usize) -> Option<Range<usize>> {
        self.open.find_at(line, at).map(|m| m.range())
    }

    /// Finds the first closing marker at or after byte `at` of `line`.
    pub fn find_close(&self, line: &str, at: usize) -> Option<Range<usize>> {
        self.close.find_at(line, at).map(|m| m.range())
    }

    /// Byte length of the opening marker `text` starts with, if any.
    pub fn leading_open(&self, text: &str) -> Option<usize> {
        self.open
            .find(text)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }

    /// Byte offset of a closing marker that ends exactly at the end of
    /// `text`, searching from byte `from`.
    pub fn trailing_close(&self, text: &str, from: usize) -> Option<usize> {
        self.close
            .find_iter(text.get(from..)?)
            .filter(|m| from + m.end() == text.len())
            .last()
            .map(|m| from + m.start())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: Regex::new(Self::DEFAULT_OPEN).expect("default open pattern compiles"),
            close: Regex::new(Self::DEFAULT_CLOSE).expect("default close pattern compiles"),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, SyntaxError> {
    let regex = Regex::new(pattern).map_err(|e| SyntaxError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    if regex.is_match("") {
        return Err(SyntaxError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern matches the empty string".to_string(),
        });
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let d = Delimiters::default();
        assert_eq!(d.find_open("x <% y", 0), Some(2..4));
        assert_eq!(d.find_open("<%* y", 0), Some(0..3));
        assert_eq!(d.find_close("y %> z %>", 0), Some(2..4));
        assert_eq!(d.find_close("y %> z %>", 4), Some(7..9));
        assert_eq!(d.find_open("no markers", 0), None);
    }

    #[test]
    fn test_leading_and_trailing() {
        let d = Delimiters::default();
        assert_eq!(d.leading_open("<%* a %>"), Some(3));
        assert_eq!(d.leading_open(" <% a %>"), None);
        assert_eq!(d.trailing_close("<% a %>", 2), Some(5));
        assert_eq!(d.trailing_close("<% a %> b", 2), None);
        assert_eq!(d.trailing_close("<%>", 2), None);
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            Delimiters::new("(", "%>"),
            Err(SyntaxError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Delimiters::new("<%", "x*"),
            Err(SyntaxError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_custom_markers() {
        let d = Delimiters::new(r"\{\{", r"\}\}").unwrap();
        assert_eq!(d.find_open("a {{ b }}", 0), Some(2..4));
        assert_eq!(d.find_close("a {{ b }}", 4), Some(7..9));
    }
}
