//! Fragment scanner: finds delimited template regions in a document.
//!
//! Pairing is strictly first-come: an opening marker starts a region, the
//! next closing marker after it ends the region, and any opening markers in
//! between are ignored. There is no nesting, escaping or bracket matching.
//! An opening marker that is never closed produces nothing.

use std::ops::Range;

use serde::Serialize;
use templight_buffer::TextBuffer;
use templight_syntax::Delimiters;

/// How a region sits in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// The opening marker is at column 0 of its line.
    Block,
    /// The opening marker is somewhere inside a line.
    Inline,
}

/// One delimited fragment, in char offsets. `end` is exclusive and falls
/// just after the closing marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub kind: RegionKind,
}

impl Region {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scans documents for regions using a pair of delimiters.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    delimiters: Delimiters,
}

impl Scanner {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Returns every closed region in document order.
    ///
    /// Regions come out sorted by `start`, never overlap, and always have
    /// `start < end`.
    pub fn scan(&self, document: &TextBuffer) -> Vec<Region> {
        let mut regions = Vec::new();
        let mut pending: Option<(usize, RegionKind)> = None;
        let mut line_start = 0;

        for line in document.lines() {
            let mut at = 0;
            loop {
                match pending {
                    None => {
                        let Some(open) = self.delimiters.find_open(&line, at) else {
                            break;
                        };
                        let kind = if open.start == 0 {
                            RegionKind::Block
                        } else {
                            RegionKind::Inline
                        };
                        pending = Some((line_start + char_len(&line[..open.start]), kind));
                        at = open.end;
                    }
                    Some((start, kind)) => {
                        let Some(close) = self.delimiters.find_close(&line, at) else {
                            break;
                        };
                        let end = line_start + char_len(&line[..close.end]);
                        regions.push(Region { start, end, kind });
                        pending = None;
                        at = close.end;
                    }
                }
            }
            line_start += char_len(&line);
        }

        if let Some((start, _)) = pending {
            tracing::trace!(start, "dropping unterminated fragment");
        }
        regions
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
