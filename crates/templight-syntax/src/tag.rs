//! Semantic tags attached to tokens by grammars.
//!
//! Tags form a small closed hierarchy: every tag may name a parent that the
//! style lookup falls back to (`controlKeyword` → `keyword`,
//! `lineComment` → `comment`). On top of a tag, a set of modifiers refines
//! the meaning (`definition(variableName)` vs plain `variableName`).

use std::fmt;

/// A base semantic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Comment,
    LineComment,
    BlockComment,
    DocComment,

    Name,
    VariableName,
    TypeName,
    TagName,
    PropertyName,
    AttributeName,
    ClassName,
    LabelName,
    Namespace,
    MacroName,

    Literal,
    String,
    DocString,
    Character,
    Number,
    Integer,
    Float,
    Bool,
    Regexp,
    Escape,
    Url,

    Keyword,
    SelfKeyword,
    Null,
    Atom,
    Modifier,
    OperatorKeyword,
    ControlKeyword,
    DefinitionKeyword,
    ModuleKeyword,

    Operator,
    DerefOperator,
    ArithmeticOperator,
    LogicOperator,
    CompareOperator,
    UpdateOperator,
    DefinitionOperator,
    ControlOperator,

    Punctuation,
    Separator,
    Bracket,
    Paren,
    Brace,
    SquareBracket,

    Content,
    Heading,
    Emphasis,
    Strong,
    Link,

    Inserted,
    Deleted,
    Changed,
    Invalid,

    Meta,
    DocumentMeta,
    Annotation,
}

impl Tag {
    /// The tag this one falls back to when it has no style of its own.
    pub fn parent(self) -> Option<Tag> {
        use Tag::*;
        match self {
            LineComment | BlockComment | DocComment => Some(Comment),

            VariableName | TypeName | PropertyName | ClassName | LabelName | Namespace
            | MacroName => Some(Name),
            TagName => Some(TypeName),
            AttributeName => Some(PropertyName),

            String | Number | Bool | Regexp | Escape | Url => Some(Literal),
            DocString | Character => Some(String),
            Integer | Float => Some(Number),

            SelfKeyword | Null | Atom | Modifier | OperatorKeyword | ControlKeyword
            | DefinitionKeyword | ModuleKeyword => Some(Keyword),

            DerefOperator | ArithmeticOperator | LogicOperator | CompareOperator
            | UpdateOperator | DefinitionOperator | ControlOperator => Some(Operator),

            Separator | Bracket => Some(Punctuation),
            Paren | Brace | SquareBracket => Some(Bracket),

            Heading | Emphasis | Strong | Link => Some(Content),

            DocumentMeta | Annotation => Some(Meta),

            Comment | Name | Literal | Keyword | Operator | Punctuation | Content | Inserted
            | Deleted | Changed | Invalid | Meta => None,
        }
    }

    /// The camelCase name used in tag notation.
    pub fn name(self) -> &'static str {
        use Tag::*;
        match self {
            Comment => "comment",
            LineComment => "lineComment",
            BlockComment => "blockComment",
            DocComment => "docComment",
            Name => "name",
            VariableName => "variableName",
            TypeName => "typeName",
            TagName => "tagName",
            PropertyName => "propertyName",
            AttributeName => "attributeName",
            ClassName => "className",
            LabelName => "labelName",
            Namespace => "namespace",
            MacroName => "macroName",
            Literal => "literal",
            String => "string",
            DocString => "docString",
            Character => "character",
            Number => "number",
            Integer => "integer",
            Float => "float",
            Bool => "bool",
            Regexp => "regexp",
            Escape => "escape",
            Url => "url",
            Keyword => "keyword",
            SelfKeyword => "self",
            Null => "null",
            Atom => "atom",
            Modifier => "modifier",
            OperatorKeyword => "operatorKeyword",
            ControlKeyword => "controlKeyword",
            DefinitionKeyword => "definitionKeyword",
            ModuleKeyword => "moduleKeyword",
            Operator => "operator",
            DerefOperator => "derefOperator",
            ArithmeticOperator => "arithmeticOperator",
            LogicOperator => "logicOperator",
            CompareOperator => "compareOperator",
            UpdateOperator => "updateOperator",
            DefinitionOperator => "definitionOperator",
            ControlOperator => "controlOperator",
            Punctuation => "punctuation",
            Separator => "separator",
            Bracket => "bracket",
            Paren => "paren",
            Brace => "brace",
            SquareBracket => "squareBracket",
            Content => "content",
            Heading => "heading",
            Emphasis => "emphasis",
            Strong => "strong",
            Link => "link",
            Inserted => "inserted",
            Deleted => "deleted",
            Changed => "changed",
            Invalid => "invalid",
            Meta => "meta",
            DocumentMeta => "documentMeta",
            Annotation => "annotation",
        }
    }

    /// Iterates over this tag and its ancestors, nearest first.
    pub fn ancestry(self) -> impl Iterator<Item = Tag> {
        std::iter::successors(Some(self), |tag| tag.parent())
    }
}

/// A set of tag modifiers, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const DEFINITION: Modifiers = Modifiers(1 << 0);
    pub const CONSTANT: Modifiers = Modifiers(1 << 1);
    pub const FUNCTION: Modifiers = Modifiers(1 << 2);
    pub const STANDARD: Modifiers = Modifiers(1 << 3);
    pub const LOCAL: Modifiers = Modifiers(1 << 4);
    pub const SPECIAL: Modifiers = Modifiers(1 << 5);

    const NAMES: [(Modifiers, &'static str); 6] = [
        (Self::DEFINITION, "definition"),
        (Self::CONSTANT, "constant"),
        (Self::FUNCTION, "function"),
        (Self::STANDARD, "standard"),
        (Self::LOCAL, "local"),
        (Self::SPECIAL, "special"),
    ];

    pub fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Every subset of this set, largest first. The set itself comes first
    /// and the empty set last.
    pub fn subsets(self) -> Vec<Modifiers> {
        let mut subsets = Vec::with_capacity(1 << self.len());
        let mut sub = self.0;
        loop {
            subsets.push(Modifiers(sub));
            if sub == 0 {
                break;
            }
            sub = (sub - 1) & self.0;
        }
        subsets.sort_by(|a, b| b.len().cmp(&a.len()).then(b.0.cmp(&a.0)));
        subsets
    }
}

/// A tag together with its modifiers, e.g. `definition(variableName)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleTag {
    pub tag: Tag,
    pub modifiers: Modifiers,
}

impl StyleTag {
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with(self, modifiers: Modifiers) -> Self {
        Self {
            tag: self.tag,
            modifiers: self.modifiers.union(modifiers),
        }
    }

    pub fn definition(self) -> Self {
        self.with(Modifiers::DEFINITION)
    }

    pub fn constant(self) -> Self {
        self.with(Modifiers::CONSTANT)
    }

    pub fn function(self) -> Self {
        self.with(Modifiers::FUNCTION)
    }

    pub fn standard(self) -> Self {
        self.with(Modifiers::STANDARD)
    }

    pub fn local(self) -> Self {
        self.with(Modifiers::LOCAL)
    }

    pub fn special(self) -> Self {
        self.with(Modifiers::SPECIAL)
    }
}

impl From<Tag> for StyleTag {
    fn from(tag: Tag) -> Self {
        StyleTag::new(tag)
    }
}

impl fmt::Display for StyleTag {
    /// Writes modifiers as nested calls, outermost first:
    /// `function(definition(variableName))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let applied: Vec<&str> = Modifiers::NAMES
            .iter()
            .rev()
            .filter(|(m, _)| self.modifiers.contains(*m))
            .map(|(_, name)| *name)
            .collect();
        for name in &applied {
            write!(f, "{name}(")?;
        }
        f.write_str(self.tag.name())?;
        for _ in &applied {
            f.write_str(")")?;
        }
        Ok(())
    }
}
