//! Decorations handed to the host renderer, and the ordered sets holding them.
//!
//! Hosts insert decorations into range sets that only accept monotonic
//! offsets, so the builder here refuses anything that would go backwards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scanner::Region;

/// Extra attributes rendered on a decoration's element.
pub type Attributes = BTreeMap<String, String>;

/// A whole-line decoration, anchored at the line's first char.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDecoration {
    pub line_start: usize,
    pub class: String,
    pub attributes: Attributes,
}

/// A decoration over a char range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkDecoration {
    pub from: usize,
    pub to: usize,
    pub class: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

/// Anything with an insertion offset.
pub trait Anchored {
    fn anchor(&self) -> usize;
}

impl Anchored for LineDecoration {
    fn anchor(&self) -> usize {
        self.line_start
    }
}

impl Anchored for MarkDecoration {
    fn anchor(&self) -> usize {
        self.from
    }
}

/// Decoration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecorationError {
    #[error("Decoration at {offset} inserted after one at {last}")]
    OutOfOrder { offset: usize, last: usize },

    #[error("Decoration range {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
}

/// An immutable, offset-ordered decoration collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecorationSet<T> {
    items: Vec<T>,
}

impl<T> DecorationSet<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for DecorationSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> IntoIterator for &'a DecorationSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Collects decorations in non-decreasing anchor order.
#[derive(Debug)]
pub struct DecorationSetBuilder<T> {
    items: Vec<T>,
    last: usize,
}

impl<T: Anchored> DecorationSetBuilder<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            last: 0,
        }
    }

    /// Appends a decoration. Fails without inserting when its anchor is
    /// before the previous one.
    pub fn add(&mut self, item: T) -> Result<(), DecorationError> {
        let offset = item.anchor();
        if offset < self.last {
            return Err(DecorationError::OutOfOrder {
                offset,
                last: self.last,
            });
        }
        self.last = offset;
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> DecorationSet<T> {
        DecorationSet { items: self.items }
    }
}

impl<T: Anchored> Default for DecorationSetBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkDecoration {
    /// Creates a mark over `from..to`.
    pub fn new(from: usize, to: usize, class: impl Into<String>) -> Result<Self, DecorationError> {
        if from > to {
            return Err(DecorationError::Inverted { from, to });
        }
        Ok(Self {
            from,
            to,
            class: class.into(),
            attributes: Attributes::new(),
        })
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// The output of one rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Decorations {
    pub lines: DecorationSet<LineDecoration>,
    pub marks: DecorationSet<MarkDecoration>,
    /// Regions whose fragment could not be highlighted. They still carry
    /// their line or inline decoration, just no token marks.
    pub unhighlighted: Vec<Region>,
}

impl Decorations {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.marks.is_empty()
    }
}
