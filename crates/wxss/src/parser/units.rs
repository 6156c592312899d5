//! Numeric literal and device unit scanning.
//!
//! Values are never fully tokenized; the compiler only needs to know where
//! the `rpx` literals sit inside an otherwise opaque value string.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of},
    combinator::{map_res, opt, recognize},
    sequence::{pair, terminated, tuple},
};

/// The device-relative length unit.
pub const RPX: &str = "rpx";

/// An `rpx` literal found inside a declaration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RpxLiteral {
    /// Byte offset of the first character of the number (sign included).
    pub start: usize,
    /// Byte offset just past the unit.
    pub end: usize,
    pub value: f64,
}

/// Parse a signed integer or decimal number (`10`, `-1.5`, `.5`).
pub fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Parse a number immediately followed by `rpx`.
pub fn parse_rpx(input: &str) -> IResult<&str, f64> {
    terminated(parse_number, tag(RPX))(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn may_start_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}

/// Locates every `rpx` literal in `value`, skipping quoted strings, block
/// comments and anything glued to a surrounding identifier (`a10rpx`, `10rpxs`).
pub fn find_rpx_literals(value: &str) -> Vec<RpxLiteral> {
    let mut found = Vec::new();
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while let Some(c) = value[i..].chars().next() {
        if let Some(q) = quote {
            if c == '\\' {
                i += c.len_utf8();
                if let Some(escaped) = value[i..].chars().next() {
                    i += escaped.len_utf8();
                }
                prev = None;
                continue;
            }
            if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            quote = Some(c);
        } else if value[i..].starts_with("/*") {
            i = value[i + 2..]
                .find("*/")
                .map_or(value.len(), |end| i + 2 + end + 2);
            prev = None;
            continue;
        } else if may_start_number(c) && !prev.is_some_and(is_ident_char) {
            if let Ok((after, number)) = parse_rpx(&value[i..]) {
                if !after.chars().next().is_some_and(is_ident_char) {
                    let end = value.len() - after.len();
                    found.push(RpxLiteral {
                        start: i,
                        end,
                        value: number,
                    });
                    prev = Some('x');
                    i = end;
                    continue;
                }
            }
        }

        prev = Some(c);
        i += c.len_utf8();
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("10").unwrap().1, 10.0);
        assert_eq!(parse_number("-1.5").unwrap().1, -1.5);
        assert_eq!(parse_number(".5rpx").unwrap(), ("rpx", 0.5));
        assert!(parse_number("rpx").is_err());
    }

    #[test]
    fn test_finds_literals_in_shorthand() {
        let found = find_rpx_literals("10rpx -20rpx 0 .5rpx");
        let values: Vec<f64> = found.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![10.0, -20.0, 0.5]);
        assert_eq!(found[1].start, 6);
        assert_eq!(found[1].end, 12);
    }

    #[test]
    fn test_ignores_glued_and_quoted_literals() {
        assert!(find_rpx_literals("a10rpx").is_empty());
        assert!(find_rpx_literals("10rpxs").is_empty());
        assert!(find_rpx_literals("\"10rpx\"").is_empty());
        assert!(find_rpx_literals("url('img-10rpx.png')").is_empty());
        assert!(find_rpx_literals("10px").is_empty());
    }

    #[test]
    fn test_finds_literals_inside_functions() {
        let found = find_rpx_literals("calc(100% - 20rpx) translate(-5rpx,3rpx)");
        let values: Vec<f64> = found.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![20.0, -5.0, 3.0]);
    }

    #[test]
    fn test_ignores_literals_in_comments() {
        let found = find_rpx_literals("10rpx /* was 20rpx */ 30rpx");
        let values: Vec<f64> = found.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![10.0, 30.0]);
        assert!(find_rpx_literals("1px /* 2rpx").is_empty());
    }
}
