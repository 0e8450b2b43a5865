//! The style table: semantic tags to display class names.

use std::collections::HashMap;

use crate::tag::{Modifiers, StyleTag, Tag};

/// Immutable mapping from semantic tags to class names.
///
/// Built once and shared by reference with every highlight call. Lookup
/// falls back through modifier subsets and then tag ancestry, so a
/// `function(variableName)` use resolves to the `variableName` class and
/// a `controlKeyword` resolves to the `keyword` class.
#[derive(Debug, Clone)]
pub struct StyleTable {
    rules: HashMap<StyleTag, String>,
}

impl StyleTable {
    /// Creates an empty table. Every lookup misses.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The standard class table used by markdown editors for code blocks.
    pub fn standard() -> Self {
        use Tag::*;

        let v = StyleTag::new(VariableName);
        let rules: [(&[StyleTag], &str); 32] = [
            (&[StyleTag::new(Link)], "cm-link"),
            (&[StyleTag::new(Heading)], "cm-heading"),
            (&[StyleTag::new(Emphasis)], "cm-emphasis"),
            (&[StyleTag::new(Strong)], "cm-strong"),
            (&[StyleTag::new(Keyword)], "cm-keyword"),
            (&[StyleTag::new(Atom)], "cm-atom"),
            (&[StyleTag::new(Bool)], "cm-bool"),
            (&[StyleTag::new(Url)], "cm-url"),
            (&[StyleTag::new(LabelName)], "cm-labelName"),
            (&[StyleTag::new(Inserted)], "cm-inserted"),
            (&[StyleTag::new(Deleted)], "cm-deleted"),
            (&[StyleTag::new(Literal)], "cm-literal"),
            (&[StyleTag::new(String)], "cm-string"),
            (&[StyleTag::new(Number)], "cm-number"),
            (
                &[
                    StyleTag::new(Regexp),
                    StyleTag::new(Escape),
                    StyleTag::new(String).special(),
                ],
                "cm-string-2",
            ),
            (&[v], "cm-variable"),
            (&[v.local()], "cm-variable cm-local"),
            (&[v.definition()], "cm-variable cm-def"),
            (&[v.special()], "cm-variable"),
            (&[StyleTag::new(TypeName)], "cm-typeName"),
            (&[StyleTag::new(Namespace)], "cm-namespace"),
            (&[StyleTag::new(MacroName)], "cm-macroName"),
            (&[StyleTag::new(PropertyName).definition()], "cm-propertyName"),
            (&[StyleTag::new(Operator)], "cm-operator"),
            (&[StyleTag::new(Comment)], "cm-comment"),
            (&[StyleTag::new(Meta)], "cm-meta"),
            (&[StyleTag::new(Invalid)], "cm-invalid"),
            (&[StyleTag::new(Punctuation)], "cm-punctuation"),
            (&[StyleTag::new(Modifier)], "cm-modifier"),
            (&[v.definition().function()], "cm-function cm-def"),
            (&[StyleTag::new(ClassName).definition()], "cm-class cm-def"),
            (&[StyleTag::new(OperatorKeyword)], "cm-operator"),
        ];

        let mut table = Self::empty();
        for (tags, class) in rules {
            for tag in tags {
                table.insert(*tag, class);
            }
        }
        table
    }

    /// Adds or replaces a rule.
    pub fn insert(&mut self, tag: StyleTag, class: impl Into<String>) {
        self.rules.insert(tag, class.into());
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves a single tag to its class, if any rule matches.
    pub fn class_for(&self, tag: StyleTag) -> Option<&str> {
        let subsets = tag.modifiers.subsets();
        tag.tag.ancestry().find_map(|base| {
            subsets.iter().find_map(|modifiers: &Modifiers| {
                self.rules
                    .get(&StyleTag {
                        tag: base,
                        modifiers: *modifiers,
                    })
                    .map(String::as_str)
            })
        })
    }

    /// Resolves every tag of a token and joins the distinct classes with
    /// spaces. Returns `None` when no tag matches.
    pub fn resolve(&self, tags: &[StyleTag]) -> Option<String> {
        let mut joined = String::new();
        let classes = tags
            .iter()
            .filter_map(|tag| self.class_for(*tag))
            .flat_map(|class| class.split(' '));
        for class in classes {
            if joined.split(' ').any(|existing| existing == class) {
                continue;
            }
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(class);
        }
        (!joined.is_empty()).then_some(joined)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard()
    }
}
