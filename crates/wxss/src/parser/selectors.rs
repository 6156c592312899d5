//! Type selector rewriting.
//!
//! Mini-app components are rendered as custom elements, so a selector such
//! as `view > text` has to target `wx-view > wx-text` once it reaches the
//! page. Everything that is not a bare type selector is copied as written.

/// Pseudo-classes whose arguments are themselves selectors.
const SELECTOR_PSEUDOS: &[&str] = &["not", "is", "where", "has", "matches"];

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Prefixes every type selector in `selector` with `prefix`.
///
/// ```rust
/// use wxss::parser::selectors::prefix_type_selectors;
///
/// assert_eq!(
///     prefix_type_selectors("view .a, text>image:not(button)", "wx-"),
///     "wx-view .a, wx-text>wx-image:not(wx-button)"
/// );
/// ```
pub fn prefix_type_selectors(selector: &str, prefix: &str) -> String {
    let mut output = String::with_capacity(selector.len() + prefix.len());
    let mut chars = selector.chars().peekable();
    // true where a compound selector may start
    let mut boundary = true;
    // the pseudo-class name directly in front of a `(`
    let mut pseudo: Option<String> = None;

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                output.push(c);
                while let Some(next) = chars.next() {
                    output.push(next);
                    if next == '\\' {
                        if let Some(escaped) = chars.next() {
                            output.push(escaped);
                        }
                    } else if next == c {
                        break;
                    }
                }
                boundary = false;
            }
            '[' => {
                output.push(c);
                for next in chars.by_ref() {
                    output.push(next);
                    if next == ']' {
                        break;
                    }
                }
                boundary = false;
            }
            '.' | '#' | ':' => {
                output.push(c);
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if is_ident_char(next) || (c == ':' && next == ':') {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                output.push_str(&name);
                pseudo = (c == ':').then(|| name.trim_start_matches(':').to_ascii_lowercase());
                boundary = false;
                continue;
            }
            '(' => {
                output.push(c);
                let takes_selector = pseudo
                    .as_deref()
                    .is_some_and(|name| SELECTOR_PSEUDOS.contains(&name));
                if takes_selector {
                    boundary = true;
                } else {
                    // `:nth-child(2n+1)` and friends: copy verbatim
                    let mut depth = 1;
                    for next in chars.by_ref() {
                        output.push(next);
                        match next {
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    boundary = false;
                }
            }
            c if c.is_whitespace() || matches!(c, ',' | '>' | '+' | '~') => {
                output.push(c);
                boundary = true;
            }
            c if boundary && is_ident_start(c) => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if is_ident_char(next) {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                output.push_str(prefix);
                output.push_str(&name);
                boundary = false;
            }
            _ => {
                output.push(c);
                boundary = false;
            }
        }
        pseudo = None;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_classes_ids_and_universal_alone() {
        assert_eq!(prefix_type_selectors(".a #b *", "wx-"), ".a #b *");
    }

    #[test]
    fn test_prefixes_compound_type_selectors() {
        assert_eq!(
            prefix_type_selectors("view.card:hover > text", "wx-"),
            "wx-view.card:hover > wx-text"
        );
    }

    #[test]
    fn test_keeps_pseudo_arguments_verbatim() {
        assert_eq!(
            prefix_type_selectors("view:nth-child(odd)::after", "wx-"),
            "wx-view:nth-child(odd)::after"
        );
    }

    #[test]
    fn test_keeps_attribute_values_verbatim() {
        assert_eq!(
            prefix_type_selectors("input[type=text] + label", "wx-"),
            "wx-input[type=text] + wx-label"
        );
    }
}
