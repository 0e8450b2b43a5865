//! JavaScript grammar backed by tree-sitter.
//!
//! ## Learning: FFI (Foreign Function Interface)
//!
//! Tree-sitter is written in C. The `tree-sitter` crate wraps the C API in
//! safe types, so nothing in this module needs `unsafe`. The parser itself
//! is stateful (`&mut` to parse), which is why it lives in a `RefCell`.

use std::cell::RefCell;

use tree_sitter::{Language, Node, Parser, TreeCursor};

use crate::grammar::Grammar;
use crate::tag::{StyleTag, Tag};
use crate::tree::TokenTree;
use crate::SyntaxError;

const NAME: &str = "javascript";

/// Node kinds whose anonymous children take the literal's own class.
const LITERAL_KINDS: &[&str] = &["string", "template_string", "regex", "jsx_text"];

/// A tree-sitter JavaScript grammar.
pub struct JavaScriptGrammar {
    parser: RefCell<Parser>,
}

impl JavaScriptGrammar {
    /// Creates a parser for JavaScript.
    pub fn new() -> Result<Self, SyntaxError> {
        let language: Language = tree_sitter_javascript::LANGUAGE.into();

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|_| SyntaxError::ParserSetup(NAME.to_string()))?;

        Ok(Self {
            parser: RefCell::new(parser),
        })
    }
}

impl Grammar for JavaScriptGrammar {
    fn name(&self) -> &str {
        NAME
    }

    fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError> {
        let tree = self
            .parser
            .borrow_mut()
            .parse(text, None)
            .ok_or_else(|| SyntaxError::ParseFailed {
                grammar: NAME.to_string(),
                len: text.len(),
            })?;

        let mut tokens = build(&mut tree.walk(), text);
        // The program node starts after leading whitespace; widen it so the
        // root always spans the whole fragment.
        if let Some(root) = tokens.root_mut() {
            root.range = 0..text.len();
        }
        Ok(tokens)
    }
}

/// Converts the tree under the cursor in preorder.
///
/// The walk is a loop over the cursor, with the open ancestors kept on an
/// explicit stack, so arbitrarily deep nesting cannot overflow the call
/// stack. Empty nodes below the root are skipped with their subtrees.
fn build(cursor: &mut TreeCursor<'_>, source: &str) -> TokenTree {
    let mut tokens = TokenTree::new();
    // (token index, node kind) of every ancestor of the cursor's node.
    let mut ancestors: Vec<(usize, &'static str)> = Vec::new();

    loop {
        let node = cursor.node();
        let range = node.byte_range();

        if ancestors.is_empty() || !range.is_empty() {
            let parent = ancestors.last().map(|&(_, kind)| kind);
            let tags = classify(node, parent, cursor.field_name(), source)
                .into_iter()
                .collect();
            let idx = tokens.open(range, tags);

            if cursor.goto_first_child() {
                ancestors.push((idx, node.kind()));
                continue;
            }
            tokens.close(idx);
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return tokens;
            }
            if let Some((idx, _)) = ancestors.pop() {
                tokens.close(idx);
            }
        }
    }
}

/// Maps a node, seen in its parent context, to a semantic tag.
fn classify(
    node: Node<'_>,
    parent: Option<&str>,
    field: Option<&str>,
    source: &str,
) -> Option<StyleTag> {
    let kind = node.kind();

    if node.is_missing() {
        return None;
    }
    if node.is_error() {
        return (node.child_count() == 0).then_some(Tag::Invalid.into());
    }

    let tag = match kind {
        "comment" | "html_comment" => {
            let text = source.get(node.byte_range()).unwrap_or_default();
            if text.starts_with("//") {
                Tag::LineComment
            } else {
                Tag::BlockComment
            }
        }
        "string" => Tag::String,
        "template_string" => return Some(StyleTag::new(Tag::String).special()),
        "escape_sequence" => Tag::Escape,
        "regex" => Tag::Regexp,
        "number" => Tag::Number,
        "true" | "false" => Tag::Bool,
        "null" | "undefined" => Tag::Null,
        "this" | "super" => Tag::SelfKeyword,
        "hash_bang_line" => Tag::Meta,
        "statement_identifier" => Tag::LabelName,
        "identifier" => return Some(classify_identifier(parent, field)),
        "property_identifier" => return Some(classify_property(parent, field)),
        "shorthand_property_identifier" => Tag::PropertyName,
        "shorthand_property_identifier_pattern" => {
            return Some(StyleTag::new(Tag::VariableName).definition());
        }
        "private_property_identifier" => {
            return Some(StyleTag::new(Tag::PropertyName).special());
        }
        _ if node.is_named() => return None,
        _ if parent.is_some_and(|p| LITERAL_KINDS.contains(&p)) => return None,
        _ => return classify_anonymous(kind),
    };
    Some(tag.into())
}

fn classify_identifier(parent: Option<&str>, field: Option<&str>) -> StyleTag {
    let variable = StyleTag::new(Tag::VariableName);
    match (parent.unwrap_or_default(), field) {
        ("variable_declarator", Some("name")) => variable.definition(),
        (
            "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function_declaration"
            | "generator_function",
            Some("name"),
        ) => variable.definition().function(),
        ("class_declaration" | "class", Some("name")) => StyleTag::new(Tag::ClassName).definition(),
        ("formal_parameters" | "rest_pattern" | "array_pattern", _) => variable.definition(),
        ("arrow_function", Some("parameter")) => variable.definition(),
        ("assignment_pattern", Some("left")) => variable.definition(),
        ("catch_clause", Some("parameter")) => variable.definition(),
        ("import_specifier" | "namespace_import" | "import_clause", _) => variable.definition(),
        ("call_expression", Some("function")) => variable.function(),
        _ => variable,
    }
}

fn classify_property(parent: Option<&str>, field: Option<&str>) -> StyleTag {
    let property = StyleTag::new(Tag::PropertyName);
    match (parent.unwrap_or_default(), field) {
        ("pair", Some("key"))
        | ("method_definition", Some("name"))
        | ("field_definition", Some("property")) => property.definition(),
        _ => property,
    }
}

/// Classifies keywords, operators and punctuation by their literal text.
fn classify_anonymous(kind: &str) -> Option<StyleTag> {
    let tag = match kind {
        "if" | "else" | "for" | "while" | "do" | "switch" | "case" | "default" | "break"
        | "continue" | "return" | "throw" | "try" | "catch" | "finally" => Tag::ControlKeyword,
        "const" | "let" | "var" | "using" | "function" | "class" | "extends" => {
            Tag::DefinitionKeyword
        }
        "import" | "export" | "from" => Tag::ModuleKeyword,
        "in" | "of" | "await" | "yield" | "void" | "typeof" | "delete" | "instanceof" => {
            Tag::OperatorKeyword
        }
        "with" | "debugger" | "as" | "new" => Tag::Keyword,
        "async" | "static" | "get" | "set" => Tag::Modifier,

        ";" | "," => Tag::Separator,
        "(" | ")" => Tag::Paren,
        "[" | "]" => Tag::SquareBracket,
        "{" | "}" | "${" => Tag::Brace,
        ":" => Tag::Punctuation,
        "=>" => return Some(StyleTag::new(Tag::Punctuation).function()),

        "." | "?." => Tag::DerefOperator,
        "=" => Tag::DefinitionOperator,
        "++" | "--" | "+=" | "-=" | "*=" | "/=" | "%=" | "**=" | "&&=" | "||=" | "??="
        | "<<=" | ">>=" | ">>>=" | "&=" | "|=" | "^=" => Tag::UpdateOperator,
        "==" | "===" | "!=" | "!==" | "<" | ">" | "<=" | ">=" => Tag::CompareOperator,
        "&&" | "||" | "??" | "!" => Tag::LogicOperator,
        "+" | "-" | "*" | "/" | "%" | "**" => Tag::ArithmeticOperator,
        "?" => Tag::ControlOperator,

        _ if kind.chars().all(|c| c.is_ascii_lowercase()) && !kind.is_empty() => Tag::Keyword,
        _ if kind.chars().all(|c| c.is_ascii_punctuation()) && !kind.is_empty() => Tag::Operator,
        _ => return None,
    };
    Some(tag.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects `(text, tag)` for every tagged node, depth-first.
    fn tags_of(text: &str) -> Vec<(&str, String)> {
        let grammar = JavaScriptGrammar::new().unwrap();
        let tree = grammar.parse(text).unwrap();
        tree.nodes()
            .iter()
            .flat_map(|node| {
                node.tags
                    .iter()
                    .map(|tag| (&text[node.range.clone()], tag.to_string()))
            })
            .collect()
    }

    #[test]
    fn test_root_spans_whole_text() {
        let grammar = JavaScriptGrammar::new().unwrap();
        let tree = grammar.parse("  x  ").unwrap();
        assert_eq!(tree.root().map(|n| n.range.clone()), Some(0..5));
    }

    #[test]
    fn test_declaration_tags() {
        let tags = tags_of("const x = 1;");
        assert_eq!(
            tags,
            vec![
                ("const", "definitionKeyword".to_string()),
                ("x", "definition(variableName)".to_string()),
                ("=", "definitionOperator".to_string()),
                ("1", "number".to_string()),
                (";", "separator".to_string()),
            ]
        );
    }

    #[test]
    fn test_function_declaration_name() {
        let tags = tags_of("function greet(name) { return name; }");
        assert!(tags.contains(&("greet", "function(definition(variableName))".to_string())));
        assert!(tags.contains(&("name", "definition(variableName)".to_string())));
        assert!(tags.contains(&("return", "controlKeyword".to_string())));
    }

    #[test]
    fn test_call_and_member_access() {
        let tags = tags_of("tp.file.title");
        assert!(tags.contains(&("tp", "variableName".to_string())));
        assert!(tags.contains(&("file", "propertyName".to_string())));
        assert!(tags.contains(&(".", "derefOperator".to_string())));

        let tags = tags_of("run()");
        assert!(tags.contains(&("run", "function(variableName)".to_string())));
    }

    #[test]
    fn test_string_children_are_untagged() {
        let tags = tags_of("'a\\n'");
        assert!(tags.contains(&("'a\\n'", "string".to_string())));
        assert!(tags.contains(&("\\n", "escape".to_string())));
        assert!(!tags.iter().any(|(text, _)| *text == "'"));
    }

    #[test]
    fn test_comments() {
        let tags = tags_of("// note\n/* block */");
        assert!(tags.contains(&("// note", "lineComment".to_string())));
        assert!(tags.contains(&("/* block */", "blockComment".to_string())));
    }

    #[test]
    fn test_anonymous_classification() {
        assert_eq!(classify_anonymous("typeof"), Some(Tag::OperatorKeyword.into()));
        assert_eq!(classify_anonymous(">>>"), Some(Tag::Operator.into()));
        assert_eq!(classify_anonymous("yield"), Some(Tag::OperatorKeyword.into()));
        assert_eq!(classify_anonymous("return"), Some(Tag::ControlKeyword.into()));
        assert_eq!(classify_anonymous("target"), Some(Tag::Keyword.into()));
        assert_eq!(classify_anonymous(""), None);
    }

    #[test]
    fn test_keyword_families() {
        let tags = tags_of("async function f() { const d = await tp.system.prompt(new Date()); }");
        assert!(tags.contains(&("await", "operatorKeyword".to_string())));
        assert!(tags.contains(&("new", "keyword".to_string())));
        assert!(tags.contains(&("async", "modifier".to_string())));

        let tags = tags_of("if (!(k in o) && typeof o === 'object') { debugger; }");
        assert!(tags.contains(&("in", "operatorKeyword".to_string())));
        assert!(tags.contains(&("typeof", "operatorKeyword".to_string())));
        assert!(tags.contains(&("debugger", "keyword".to_string())));
        assert!(tags.contains(&("if", "controlKeyword".to_string())));
    }

    #[test]
    fn test_deeply_nested_expression() {
        let depth = 50_000;
        let text = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let grammar = JavaScriptGrammar::new().unwrap();
        let tree = grammar.parse(&text).unwrap();

        assert_eq!(tree.root().map(|n| n.subtree_end), Some(tree.len()));
        let parens = tree
            .nodes()
            .iter()
            .filter(|n| n.tags == vec![StyleTag::from(Tag::Paren)])
            .count();
        assert_eq!(parens, 2 * depth);
    }
}
