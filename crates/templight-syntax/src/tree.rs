//! The token tree grammars hand to the highlighter.
//!
//! ## Learning: Trees Without Recursion
//!
//! Nodes live in one `Vec` in preorder, and each records the index just past
//! its subtree. The children of node `i` start at `i + 1` and hop from one to
//! the next through `subtree_end`. Building, shifting, walking and dropping
//! are all plain loops, so nesting depth is bounded by memory, not by the
//! call stack.

use std::ops::Range;

use crate::tag::StyleTag;

/// One node of a parsed fragment.
///
/// Ranges are byte offsets into the parsed text. Children are ordered,
/// non-overlapping and lie inside the parent's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNode {
    pub range: Range<usize>,
    pub tags: Vec<StyleTag>,
    /// Index of the first node after this subtree.
    pub subtree_end: usize,
}

/// A token tree stored in preorder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTree {
    nodes: Vec<TokenNode>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single childless node.
    pub fn leaf(range: Range<usize>, tags: Vec<StyleTag>) -> Self {
        let mut tree = Self::new();
        let root = tree.open(range, tags);
        tree.close(root);
        tree
    }

    /// A node wrapping `children`, in order.
    pub fn branch(
        range: Range<usize>,
        tags: Vec<StyleTag>,
        children: impl IntoIterator<Item = TokenTree>,
    ) -> Self {
        let mut tree = Self::new();
        let root = tree.open(range, tags);
        for child in children {
            tree.append(child);
        }
        tree.close(root);
        tree
    }

    /// Starts a node. Everything pushed before the matching
    /// [`close`](Self::close) becomes its descendants.
    pub fn open(&mut self, range: Range<usize>, tags: Vec<StyleTag>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TokenNode {
            range,
            tags,
            subtree_end: idx + 1,
        });
        idx
    }

    /// Ends the node started by [`open`](Self::open) at `idx`.
    pub fn close(&mut self, idx: usize) {
        let end = self.nodes.len();
        if let Some(node) = self.nodes.get_mut(idx) {
            node.subtree_end = end;
        }
    }

    /// Appends `other` under the currently open node.
    pub fn append(&mut self, other: TokenTree) {
        let base = self.nodes.len();
        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.subtree_end += base;
            node
        }));
    }

    /// Moves every node `offset` bytes to the right.
    pub fn shift(&mut self, offset: usize) {
        for node in &mut self.nodes {
            node.range = node.range.start + offset..node.range.end + offset;
        }
    }

    pub fn root(&self) -> Option<&TokenNode> {
        self.nodes.first()
    }

    pub fn root_mut(&mut self) -> Option<&mut TokenNode> {
        self.nodes.first_mut()
    }

    /// All nodes in preorder.
    pub fn nodes(&self) -> &[TokenNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<TokenNode> {
        self.nodes
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn test_branch_records_subtree_ends() {
        let inner = TokenTree::branch(
            2..6,
            vec![],
            vec![TokenTree::leaf(2..3, vec![Tag::Paren.into()])],
        );
        let tree = TokenTree::branch(
            0..8,
            vec![],
            vec![TokenTree::leaf(0..2, vec![Tag::Meta.into()]), inner],
        );
        let ends: Vec<_> = tree.nodes().iter().map(|n| n.subtree_end).collect();
        assert_eq!(ends, vec![4, 2, 4, 4]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_shift_moves_every_node() {
        let mut tree = TokenTree::branch(0..4, vec![], vec![TokenTree::leaf(1..2, vec![])]);
        tree.shift(3);
        let ranges: Vec<_> = tree.nodes().iter().map(|n| n.range.clone()).collect();
        assert_eq!(ranges, vec![3..7, 4..5]);
    }

    #[test]
    fn test_deep_chain_is_built_and_dropped() {
        let depth = 200_000;
        let mut tree = TokenTree::new();
        let open: Vec<_> = (0..depth).map(|i| tree.open(i..2 * depth - i, vec![])).collect();
        for idx in open.into_iter().rev() {
            tree.close(idx);
        }
        assert_eq!(tree.root().map(|n| n.subtree_end), Some(depth));
        assert_eq!(tree.nodes()[depth - 1].subtree_end, depth);
        drop(tree);
    }
}
