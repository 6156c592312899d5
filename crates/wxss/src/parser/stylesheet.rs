use crate::parser::position::Span;

/// A node of a parsed stylesheet.
///
/// `Comment` stands in for every construct that carries no output of its
/// own; consumers are expected to skip it.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Root(Root),
    Rule(Rule),
    Declaration(Declaration),
    AtRule(AtRule),
    Comment(Comment),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Root(root) => root.span,
            Node::Rule(rule) => rule.span,
            Node::Declaration(decl) => decl.span,
            Node::AtRule(at_rule) => at_rule.span,
            Node::Comment(comment) => comment.span,
        }
    }
}

/// A whole stylesheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Root {
    pub nodes: Vec<Node>,
    pub span: Span,
}

/// `selector { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Raw selector text, trimmed.
    pub selector: String,
    pub nodes: Vec<Node>,
    pub span: Span,
}

/// `prop: value !important;`
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub prop: String,
    /// Raw text between the property name and the value, colon included.
    pub between: String,
    /// Raw value with the important marker removed.
    pub value: String,
    /// The important marker exactly as written, e.g. `!important` or `! IMPORTANT`.
    pub important: Option<String>,
    /// Whether a `;` terminated the declaration in source.
    pub semicolon: bool,
    pub span: Span,
}

impl Declaration {
    pub fn is_important(&self) -> bool {
        self.important.is_some()
    }
}

/// `@name params;` or `@name params { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` when the at-rule has no block.
    pub nodes: Option<Vec<Node>>,
    pub span: Span,
}

impl AtRule {
    pub fn has_block(&self) -> bool {
        self.nodes.is_some()
    }

    /// `@keyframes` and its vendor-prefixed forms such as `@-webkit-keyframes`.
    pub fn is_keyframes(&self) -> bool {
        is_keyframes_name(&self.name)
    }
}

pub fn is_keyframes_name(name: &str) -> bool {
    if name == "keyframes" {
        return true;
    }
    match name.strip_prefix('-').and_then(|rest| rest.split_once('-')) {
        Some((vendor, "keyframes")) => {
            !vendor.is_empty() && vendor.chars().all(|c| c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// `/* text */`
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}
