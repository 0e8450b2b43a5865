//! The grammar interface and the language registry.

use crate::javascript::JavaScriptGrammar;
use crate::tree::TokenTree;
use crate::SyntaxError;

/// Anything that can turn fragment text into a token tree.
///
/// Implementations reparse from scratch on every call. The returned tree
/// should cover `0..text.len()`; ranges outside the text are clamped by the
/// highlighter.
pub trait Grammar {
    /// Human-readable grammar name, used in logs and errors.
    fn name(&self) -> &str;

    /// Parses `text` into a preorder token tree with byte ranges.
    fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError>;
}

impl<G: Grammar + ?Sized> Grammar for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn parse(&self, text: &str) -> Result<TokenTree, SyntaxError> {
        (**self).parse(text)
    }
}

/// Resolves configured language names to grammars.
pub struct LanguageRegistry;

impl LanguageRegistry {
    /// Creates the grammar for a language name or alias.
    pub fn grammar(lang: &str) -> Result<Box<dyn Grammar>, SyntaxError> {
        match lang.to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Ok(Box::new(JavaScriptGrammar::new()?)),
            _ => Err(SyntaxError::UnknownLanguage(lang.to_string())),
        }
    }

    /// Returns supported languages.
    pub fn supported_languages() -> &'static [&'static str] {
        &["javascript"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language() {
        let grammar = LanguageRegistry::grammar("JS").unwrap();
        assert_eq!(grammar.name(), "javascript");
    }

    #[test]
    fn test_unknown_language() {
        let result = LanguageRegistry::grammar("unknown_lang");
        assert!(matches!(result, Err(SyntaxError::UnknownLanguage(_))));
    }

    #[test]
    fn test_supported_languages_resolve() {
        for lang in LanguageRegistry::supported_languages() {
            assert!(LanguageRegistry::grammar(lang).is_ok());
        }
    }
}
