//! # Templight Syntax
//!
//! Token-level highlighting for script fragments embedded in documents.
//!
//! ```text
//! fragment text ──► Grammar::parse ──► TokenTree ──► highlight() ──► TokenSpan*
//!                                          │                ▲
//!                                          └── StyleTag ────┘ StyleTable lookup
//! ```
//!
//! ## Why Tree-sitter?
//!
//! Tree-sitter is a parser generator tool and parsing library:
//! - **Error-tolerant**: Produces valid syntax trees even for half-typed code
//! - **Fast**: Written in C with Rust bindings
//! - **Accurate**: Real parsing, not regex-based highlighting
//!
//! Each fragment is reparsed from scratch on every rebuild; nothing here keeps
//! a tree between calls.
//!
//! ## Learning: Traits as Seams
//!
//! The highlighter never names tree-sitter. It talks to `&dyn Grammar`, so a
//! test grammar or another language can be swapped in without touching the
//! scanner or the decoration builder.

mod delimiters;
mod grammar;
mod highlight;
mod javascript;
mod style;
mod tag;
mod template;
mod tree;

pub use delimiters::Delimiters;
pub use grammar::{Grammar, LanguageRegistry};
pub use highlight::{TokenSpan, TokenSpans, highlight};
pub use javascript::JavaScriptGrammar;
pub use style::StyleTable;
pub use tag::{Modifiers, StyleTag, Tag};
pub use template::TemplateGrammar;
pub use tree::{TokenNode, TokenTree};

/// Errors that can occur during syntax highlighting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Parser setup failed for {0}")]
    ParserSetup(String),

    #[error("Parse failed for {grammar} fragment of {len} bytes")]
    ParseFailed { grammar: String, len: usize },

    #[error("Invalid delimiter pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
