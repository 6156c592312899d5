use wxss::parser::{Declaration, Node, parse_stylesheet};

fn declarations(source: &str) -> Vec<Declaration> {
    let root = parse_stylesheet(source).expect("valid stylesheet");
    let Some(Node::Rule(rule)) = root.nodes.into_iter().next() else {
        panic!("expected a rule");
    };
    rule.nodes
        .into_iter()
        .filter_map(|n| match n {
            Node::Declaration(d) => Some(d),
            _ => None,
        })
        .collect()
}

#[test]
fn test_separator_is_preserved() {
    let decls = declarations(".a{width:10rpx;height : 20rpx}");
    assert_eq!(decls[0].between, ":");
    assert_eq!(decls[1].between, " : ");
    assert_eq!(decls[1].value, "20rpx");
}

#[test]
fn test_semicolon_tracking() {
    let decls = declarations(".a{color:red;width:1px}");
    assert!(decls[0].semicolon);
    assert!(!decls[1].semicolon);
}

#[test]
fn test_important_marker_as_written() {
    let decls = declarations(".a { color: red !important; margin: 0 ! IMPORTANT }");
    assert_eq!(decls[0].value, "red");
    assert_eq!(decls[0].important.as_deref(), Some("!important"));
    assert_eq!(decls[1].value, "0");
    assert_eq!(decls[1].important.as_deref(), Some("! IMPORTANT"));
    assert!(decls[1].is_important());
}

#[test]
fn test_value_with_semicolon_in_string() {
    let decls = declarations(r#".a { content: "a;b"; color: red }"#);
    assert_eq!(decls[0].value, r#""a;b""#);
    assert_eq!(decls[1].prop, "color");
}

#[test]
fn test_value_with_semicolon_in_url() {
    let decls = declarations(".a { background: url(data:image/png;base64,AAA=) }");
    assert_eq!(decls[0].value, "url(data:image/png;base64,AAA=)");
}

#[test]
fn test_custom_property() {
    let decls = declarations(".a { --main-gap: 24rpx; }");
    assert_eq!(decls[0].prop, "--main-gap");
    assert_eq!(decls[0].value, "24rpx");
}

#[test]
fn test_declaration_span() {
    let decls = declarations(".a {\n  width: 10rpx;\n}");
    assert_eq!(decls[0].span.start.line, 2);
    assert_eq!(decls[0].span.start.column, 3);
    assert_eq!(decls[0].span.end.column, 15);
}
