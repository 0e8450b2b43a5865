//! Grammar wrapper for whole template fragments, markers included.

use crate::delimiters::Delimiters;
use crate::grammar::Grammar;
use crate::tag::Tag;
use crate::tree::TokenTree;
use crate::SyntaxError;

/// Parses `<% body %>` fragments.
///
/// The leading opening marker and trailing closing marker become `meta`
/// tokens; the body between them goes to the inner grammar. Text without
/// markers is handed to the inner grammar whole.
pub struct TemplateGrammar<G> {
    inner: G,
    delimiters: Delimiters,
    name: String,
}

impl<G: Grammar> TemplateGrammar<G> {
    pub fn new(inner: G, delimiters: Delimiters) -> Self {
        let name = format!("template({})", inner.name());
        Self {
            inner,
            delimiters,
            name,
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Grammar> Grammar for TemplateGrammar<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError> {
        let open_end = self.delimiters.leading_open(text).unwrap_or(0);
        let close_start = self
            .delimiters
            .trailing_close(text, open_end)
            .unwrap_or(text.len());

        let mut children = Vec::with_capacity(3);
        if open_end > 0 {
            children.push(TokenTree::leaf(0..open_end, vec![Tag::Meta.into()]));
        }

        let body = &text[open_end..close_start];
        if !body.is_empty() {
            let mut inner = self.inner.parse(body)?;
            inner.shift(open_end);
            children.push(inner);
        }

        if close_start < text.len() {
            children.push(TokenTree::leaf(
                close_start..text.len(),
                vec![Tag::Meta.into()],
            ));
        }

        Ok(TokenTree::branch(0..text.len(), Vec::new(), children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::javascript::JavaScriptGrammar;
    use crate::tag::StyleTag;

    /// Records the body it was asked to parse as a single untagged leaf.
    struct Echo;

    impl Grammar for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError> {
            Ok(TokenTree::leaf(0..text.len(), vec![Tag::Name.into()]))
        }
    }

    struct Broken;

    impl Grammar for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError> {
            Err(SyntaxError::ParseFailed {
                grammar: "broken".to_string(),
                len: text.len(),
            })
        }
    }

    /// `(range, tags)` of every node below the root, in preorder.
    fn below_root(tree: &TokenTree) -> Vec<(std::ops::Range<usize>, Vec<StyleTag>)> {
        tree.nodes()[1..]
            .iter()
            .map(|n| (n.range.clone(), n.tags.clone()))
            .collect()
    }

    #[test]
    fn test_markers_become_meta() {
        let grammar = TemplateGrammar::new(Echo, Delimiters::default());
        let tree = grammar.parse("<%* a %>").unwrap();
        assert_eq!(tree.root().map(|n| n.range.clone()), Some(0..8));
        assert_eq!(
            below_root(&tree),
            vec![
                (0..3, vec![Tag::Meta.into()]),
                (3..6, vec![Tag::Name.into()]),
                (6..8, vec![Tag::Meta.into()]),
            ]
        );
    }

    #[test]
    fn test_empty_body() {
        let grammar = TemplateGrammar::new(Echo, Delimiters::default());
        let tree = grammar.parse("<%%>").unwrap();
        let ranges: Vec<_> = below_root(&tree).into_iter().map(|(r, _)| r).collect();
        assert_eq!(ranges, vec![0..2, 2..4]);
    }

    #[test]
    fn test_text_without_markers_goes_to_inner() {
        let grammar = TemplateGrammar::new(Echo, Delimiters::default());
        let tree = grammar.parse("plain").unwrap();
        assert_eq!(below_root(&tree), vec![(0..5, vec![Tag::Name.into()])]);
    }

    #[test]
    fn test_inner_failure_propagates() {
        let grammar = TemplateGrammar::new(Broken, Delimiters::default());
        assert!(grammar.parse("<% x %>").is_err());
        // Marker-only fragments never reach the inner grammar.
        assert!(grammar.parse("<%%>").is_ok());
    }

    #[test]
    fn test_inner_tree_is_shifted() {
        let grammar = TemplateGrammar::new(JavaScriptGrammar::new().unwrap(), Delimiters::default());
        assert_eq!(grammar.name(), "template(javascript)");
        let tree = grammar.parse("<% 42 %>").unwrap();
        let body = &tree.nodes()[2];
        assert_eq!(body.range, 2..6);
        assert!(body.subtree_end > 3);
        assert_eq!(tree.nodes().last().map(|n| n.range.clone()), Some(6..8));
    }
}
