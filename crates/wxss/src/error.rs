//! Error types for WXSS parsing.
//!
//! Every parse failure carries the 1-based line and column where the
//! offending construct starts, so callers can point at the source without
//! knowing anything about the parser internals.

use thiserror::Error;

use crate::parser::position::Position;

/// What went wrong while reading a stylesheet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A `{` was opened but never closed.
    #[error("unclosed block")]
    UnclosedBlock,

    /// A quoted string runs to the end of the input.
    #[error("unclosed string")]
    UnclosedString,

    /// A `/*` comment runs to the end of the input.
    #[error("unclosed comment")]
    UnclosedComment,

    /// A `(` or `[` was opened but never closed.
    #[error("unclosed bracket")]
    UnclosedBracket,

    /// A `}` appeared at the top level.
    #[error("unexpected `}}`")]
    UnexpectedClose,

    /// Text that is neither a rule nor a `property: value` declaration.
    #[error("unknown word `{0}`")]
    UnknownWord(String),

    /// An `@` that is not followed by a name.
    #[error("at-rule without a name")]
    MissingAtRuleName,

    /// A block opened with nothing in front of it.
    #[error("missing selector")]
    MissingSelector,
}

/// A syntax error together with where it happened.
///
/// # Examples
///
/// ```rust
/// use wxss::parser::parse_stylesheet;
///
/// let err = parse_stylesheet(".a {\n  color: red;\n").unwrap_err();
/// assert_eq!(err.position.line, 1);
/// assert_eq!(err.position.column, 1);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {}, column {}", .position.line, .position.column)]
pub struct ParseError {
    pub kind: SyntaxError,
    pub position: Position,
}

impl ParseError {
    pub fn new(kind: SyntaxError, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}
