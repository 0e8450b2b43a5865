//! The token highlighter: token tree in, contiguous styled spans out.
//!
//! ## Learning: Iterators Without Borrowing Yourself
//!
//! A lazy walk over a tree the iterator also owns would need a
//! self-referential struct if it held references into the tree. The token
//! tree is already a preorder `Vec` where each node records the index just
//! past its subtree, so the walk keeps a stack of plain indices and the
//! iterator owns everything.

use std::iter::Peekable;
use std::ops::Range;

use crate::grammar::Grammar;
use crate::style::StyleTable;
use crate::tree::{TokenNode, TokenTree};
use crate::SyntaxError;

/// A slice of a fragment, in char offsets relative to the fragment start.
///
/// `class` is `None` for unstyled text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    pub from: usize,
    pub to: usize,
    pub class: Option<String>,
}

impl TokenSpan {
    pub fn is_styled(&self) -> bool {
        self.class.is_some()
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Parses `text` with `grammar` and returns its spans lazily.
///
/// The spans cover `0..text.chars().count()` exactly: contiguous, in order,
/// no overlap, unstyled gaps included. Empty text yields no spans and never
/// reaches the grammar.
pub fn highlight<'a>(
    text: &'a str,
    grammar: &dyn Grammar,
    styles: &'a StyleTable,
) -> Result<TokenSpans<'a>, SyntaxError> {
    if text.is_empty() {
        return Ok(TokenSpans::new(text, None, styles));
    }

    let tree = grammar.parse(text)?;
    tracing::trace!(
        grammar = grammar.name(),
        bytes = text.len(),
        nodes = tree.len(),
        "parsed fragment"
    );
    Ok(TokenSpans::new(text, Some(tree), styles))
}

// ==================== Tree Walk ====================

/// A byte range with the class in effect over it.
#[derive(Debug)]
struct Segment {
    range: Range<usize>,
    class: Option<String>,
}

struct Frame {
    node: usize,
    /// Next child to visit.
    child: usize,
    /// Bytes before this have been yielded.
    cursor: usize,
    end: usize,
    class: Option<String>,
}

/// Depth-first, left-to-right segments. A node's own class covers the parts
/// not covered by children; untagged children inherit it.
struct Segments<'a> {
    nodes: Vec<TokenNode>,
    stack: Vec<Frame>,
    styles: &'a StyleTable,
}

impl<'a> Segments<'a> {
    fn new(tree: Option<TokenTree>, len: usize, styles: &'a StyleTable) -> Self {
        let nodes = tree.map(TokenTree::into_nodes).unwrap_or_default();

        let stack = nodes
            .first()
            .map(|root| {
                let start = root.range.start.min(len);
                Frame {
                    node: 0,
                    child: 1,
                    cursor: start,
                    end: root.range.end.clamp(start, len),
                    class: styles.resolve(&root.tags),
                }
            })
            .into_iter()
            .collect();

        Self {
            nodes,
            stack,
            styles,
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            let frame = self.stack.last_mut()?;
            let subtree_end = self.nodes[frame.node].subtree_end.min(self.nodes.len());

            if frame.child < subtree_end {
                let idx = frame.child;
                let child = &self.nodes[idx];
                frame.child = child.subtree_end.max(idx + 1);

                let start = child.range.start.clamp(frame.cursor, frame.end);
                let end = child.range.end.clamp(start, frame.end);
                let gap = frame.cursor..start;
                let parent_class = frame.class.clone();
                frame.cursor = end;

                let class = self
                    .styles
                    .resolve(&child.tags)
                    .or_else(|| parent_class.clone());
                self.stack.push(Frame {
                    node: idx,
                    child: idx + 1,
                    cursor: start,
                    end,
                    class,
                });

                if !gap.is_empty() {
                    return Some(Segment {
                        range: gap,
                        class: parent_class,
                    });
                }
            } else {
                let frame = self.stack.pop()?;
                if frame.cursor < frame.end {
                    return Some(Segment {
                        range: frame.cursor..frame.end,
                        class: frame.class,
                    });
                }
            }
        }
    }
}

// ==================== Spans ====================

/// Lazy, exhaustive sequence of [`TokenSpan`]s over one fragment.
///
/// Adjacent segments with the same class are merged into one span.
pub struct TokenSpans<'a> {
    text: &'a str,
    segments: Peekable<Segments<'a>>,
    /// Bytes before this have been yielded.
    pos: usize,
    queued: Option<TokenSpan>,
    /// Last byte offset converted to chars, and its char offset.
    converted: (usize, usize),
}

impl<'a> TokenSpans<'a> {
    fn new(text: &'a str, tree: Option<TokenTree>, styles: &'a StyleTable) -> Self {
        Self {
            text,
            segments: Segments::new(tree, text.len(), styles).peekable(),
            pos: 0,
            queued: None,
            converted: (0, 0),
        }
    }

    /// Converts a byte offset to a char offset. Offsets are requested in
    /// non-decreasing order, so counting resumes from the previous one.
    fn char_offset(&mut self, byte: usize) -> usize {
        let mut byte = byte.min(self.text.len());
        while !self.text.is_char_boundary(byte) {
            byte -= 1;
        }
        let (last_byte, last_char) = self.converted;
        let chars = if byte >= last_byte {
            last_char + self.text[last_byte..byte].chars().count()
        } else {
            self.text[..byte].chars().count()
        };
        self.converted = (byte, chars);
        chars
    }

    fn span(&mut self, from: usize, to: usize, class: Option<String>) -> Option<TokenSpan> {
        if from >= to {
            return None;
        }
        let from = self.char_offset(from);
        let to = self.char_offset(to);
        (from < to).then_some(TokenSpan { from, to, class })
    }
}

impl Iterator for TokenSpans<'_> {
    type Item = TokenSpan;

    fn next(&mut self) -> Option<TokenSpan> {
        if let Some(span) = self.queued.take() {
            return Some(span);
        }

        let len = self.text.len();
        loop {
            let Some(segment) = self.segments.next() else {
                let from = self.pos;
                self.pos = len;
                return self.span(from, len, None);
            };
            let Some(class) = segment.class else {
                continue;
            };

            let start = segment.range.start.max(self.pos);
            let mut end = segment.range.end.min(len);
            while let Some(next) = self.segments.peek() {
                if next.range.start != end || next.class.as_deref() != Some(class.as_str()) {
                    break;
                }
                end = next.range.end.min(len);
                self.segments.next();
            }
            if start >= end {
                continue;
            }

            let gap_from = self.pos;
            self.pos = end;
            let gap = self.span(gap_from, start, None);
            let styled = self.span(start, end, Some(class));
            match (gap, styled) {
                (Some(gap), styled) => {
                    self.queued = styled;
                    return Some(gap);
                }
                (None, Some(styled)) => return Some(styled),
                (None, None) => continue,
            }
        }
    }
}
