//! WXSS parsing and source tree data structures.
//!
//! This module turns stylesheet text into a tree of [`Node`]s that keeps
//! enough raw text to reproduce the source faithfully:
//!
//! - [`parse_stylesheet`]: Main entry point, yields a [`Root`]
//! - [`Rule`]: `selector { ... }` with its raw selector
//! - [`Declaration`]: `prop: value` with the raw separator and important marker
//! - [`AtRule`]: `@name params` with an optional block
//! - [`Comment`]: block comments, kept as nodes so positions stay honest
//!
//! ## Submodules
//!
//! - [`position`]: Line/column positions and spans
//! - [`selectors`]: Type selector rewriting
//! - [`stylesheet`]: Source tree node types
//! - [`units`]: Numeric literal and `rpx` unit scanning
//!
//! ## Example
//!
//! ```rust
//! use wxss::parser::{parse_stylesheet, Node};
//!
//! let root = parse_stylesheet(".a { width: 10rpx; }").unwrap();
//! let Node::Rule(rule) = &root.nodes[0] else { panic!("expected a rule") };
//! assert_eq!(rule.selector, ".a");
//! ```

pub mod position;
pub mod selectors;
pub mod stylesheet;
pub mod units;

pub use crate::parser::position::{Position, Span};
pub use crate::parser::stylesheet::{
    AtRule, Comment, Declaration, Node, Root, Rule, is_keyframes_name,
};

use crate::error::{ParseError, SyntaxError};
use crate::parser::position::LineIndex;

use nom::{
    IResult,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::recognize,
    sequence::{delimited, pair, preceded, tuple},
};

/// Parses a full stylesheet into a [`Root`].
pub fn parse_stylesheet(source: &str) -> Result<Root, ParseError> {
    let mut parser = Parser::new(source);
    let nodes = parser.parse_nodes(None)?;
    Ok(Root {
        nodes,
        span: Span::new(Position::START, parser.position()),
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_property_char(c: char) -> bool {
    // `*` covers the legacy IE property hack, `$` template placeholders
    is_name_char(c) || c == '*' || c == '$'
}

/// Splits `prop: value` into the property name and the raw separator.
fn declaration_head(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        take_while1(is_property_char),
        recognize(tuple((multispace0, char(':'), multispace0))),
    )(input)
}

fn at_keyword(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_while(is_name_char))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

/// Strips a trailing `!important` marker (any case, any inner spacing).
fn split_important(value: &str) -> (&str, Option<&str>) {
    if let Some(bang) = value.rfind('!') {
        let marker = &value[bang..];
        let word: String = marker[1..].chars().filter(|c| !c.is_whitespace()).collect();
        if word.eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), Some(marker));
        }
    }
    (value, None)
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
    lines: LineIndex,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            lines: LineIndex::new(source),
        }
    }

    fn consumed(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn position(&self) -> Position {
        self.position_after(0)
    }

    /// Position of the byte `offset` bytes into the unconsumed input.
    fn position_after(&self, offset: usize) -> Position {
        self.lines.position(self.source, self.consumed() + offset)
    }

    fn error(&self, kind: SyntaxError) -> ParseError {
        ParseError::new(kind, self.position())
    }

    fn error_after(&self, offset: usize, kind: SyntaxError) -> ParseError {
        ParseError::new(kind, self.position_after(offset))
    }

    fn advance(&mut self, len: usize) {
        self.rest = &self.rest[len..];
    }

    fn skip_whitespace(&mut self) {
        if let Ok((rest, _)) = multispace0::<&str, nom::error::Error<&str>>(self.rest) {
            self.rest = rest;
        }
    }

    /// Parses nodes until the end of input (`owner` is `None`) or until the
    /// `}` closing the block opened by the node starting at `owner`.
    fn parse_nodes(&mut self, owner: Option<Position>) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();

            if self.rest.is_empty() {
                return match owner {
                    Some(position) => Err(ParseError::new(SyntaxError::UnclosedBlock, position)),
                    None => Ok(nodes),
                };
            }

            if self.rest.starts_with('}') {
                if owner.is_none() {
                    return Err(self.error(SyntaxError::UnexpectedClose));
                }
                self.advance(1);
                return Ok(nodes);
            }

            if self.rest.starts_with(';') {
                self.advance(1);
                continue;
            }

            let node = if self.rest.starts_with("/*") {
                self.parse_comment()?
            } else if self.rest.starts_with('@') {
                self.parse_at_rule()?
            } else {
                self.parse_rule_or_declaration()?
            };
            nodes.push(node);
        }
    }

    fn parse_comment(&mut self) -> Result<Node, ParseError> {
        let start = self.position();
        let (rest, text) =
            block_comment(self.rest).map_err(|_| self.error(SyntaxError::UnclosedComment))?;
        self.rest = rest;
        Ok(Node::Comment(Comment {
            text: text.trim().to_string(),
            span: Span::new(start, self.position()),
        }))
    }

    fn parse_at_rule(&mut self) -> Result<Node, ParseError> {
        let start = self.position();
        let (rest, name) =
            at_keyword(self.rest).map_err(|_| self.error(SyntaxError::MissingAtRuleName))?;
        if name.is_empty() {
            return Err(self.error(SyntaxError::MissingAtRuleName));
        }
        self.rest = rest;

        let (end, terminator) = self.scan()?;
        let params = self.rest[..end].trim().to_string();
        self.advance(end);

        let nodes = match terminator {
            Some('{') => {
                self.advance(1);
                Some(self.parse_nodes(Some(start))?)
            }
            Some(';') => {
                self.advance(1);
                None
            }
            // `}` closes the enclosing block and is left for the caller
            _ => None,
        };

        Ok(Node::AtRule(AtRule {
            name: name.to_string(),
            params,
            nodes,
            span: Span::new(start, self.position()),
        }))
    }

    fn parse_rule_or_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.position();
        let (end, terminator) = self.scan()?;
        let rest = self.rest;
        let text = &rest[..end];

        if terminator == Some('{') {
            let selector = text.trim();
            if selector.is_empty() {
                return Err(self.error(SyntaxError::MissingSelector));
            }
            self.advance(end + 1);
            let nodes = self.parse_nodes(Some(start))?;
            return Ok(Node::Rule(Rule {
                selector: selector.to_string(),
                nodes,
                span: Span::new(start, self.position()),
            }));
        }

        let Ok((value, (prop, between))) = declaration_head(text) else {
            let word = text.split_whitespace().next().unwrap_or(text);
            return Err(self.error(SyntaxError::UnknownWord(word.to_string())));
        };
        let (value, important) = split_important(value.trim_end());
        let span_end = self.position_after(text.trim_end().len());

        self.advance(end);
        let semicolon = terminator == Some(';');
        if semicolon {
            self.advance(1);
        }

        Ok(Node::Declaration(Declaration {
            prop: prop.to_string(),
            between: between.to_string(),
            value: value.to_string(),
            important: important.map(str::to_string),
            semicolon,
            span: Span::new(start, span_end),
        }))
    }

    /// Finds the first `{`, `;` or `}` that is not inside a string, a
    /// comment, or a bracket pair. Returns its byte offset into the
    /// unconsumed input, or the input length and `None` at end of input.
    fn scan(&self) -> Result<(usize, Option<char>), ParseError> {
        let mut brackets: Vec<(char, usize)> = Vec::new();
        let mut chars = self.rest.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' | '\'' => {
                    let mut closed = false;
                    while let Some((_, next)) = chars.next() {
                        if next == '\\' {
                            chars.next();
                        } else if next == c {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(self.error_after(i, SyntaxError::UnclosedString));
                    }
                }
                '/' if matches!(chars.peek(), Some((_, '*'))) => {
                    chars.next();
                    let mut closed = false;
                    while let Some((_, next)) = chars.next() {
                        if next == '*' && matches!(chars.peek(), Some((_, '/'))) {
                            chars.next();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(self.error_after(i, SyntaxError::UnclosedComment));
                    }
                }
                '(' => brackets.push((')', i)),
                '[' => brackets.push((']', i)),
                ')' | ']' => {
                    if brackets.last().is_some_and(|(close, _)| *close == c) {
                        brackets.pop();
                    }
                }
                '{' | ';' | '}' if brackets.is_empty() => return Ok((i, Some(c))),
                _ => {}
            }
        }

        if let Some(&(_, open)) = brackets.last() {
            return Err(self.error_after(open, SyntaxError::UnclosedBracket));
        }
        Ok((self.rest.len(), None))
    }
}
