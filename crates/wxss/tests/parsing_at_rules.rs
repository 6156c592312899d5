use wxss::parser::{Node, parse_stylesheet};

#[test]
fn test_import_without_block() {
    let root = parse_stylesheet("@import \"common.wxss\";\n.a{}").unwrap();
    let Node::AtRule(at) = &root.nodes[0] else {
        panic!("expected an at-rule");
    };
    assert_eq!(at.name, "import");
    assert_eq!(at.params, "\"common.wxss\"");
    assert!(!at.has_block());
    assert_eq!(at.span.start.line, 1);
    assert_eq!(root.nodes.len(), 2);
}

#[test]
fn test_media_with_nested_rules() {
    let root = parse_stylesheet("@media (min-width: 400px) { .a { color: red } .b {} }").unwrap();
    let Node::AtRule(at) = &root.nodes[0] else {
        panic!("expected an at-rule");
    };
    assert_eq!(at.name, "media");
    assert_eq!(at.params, "(min-width: 400px)");
    assert_eq!(at.nodes.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_keyframes_recognition() {
    let root =
        parse_stylesheet("@keyframes a { from {} } @-webkit-keyframes b { to {} } @media x {}")
            .unwrap();
    let flags: Vec<bool> = root
        .nodes
        .iter()
        .map(|n| matches!(n, Node::AtRule(at) if at.is_keyframes()))
        .collect();
    assert_eq!(flags, vec![true, true, false]);
}

#[test]
fn test_font_face_without_params() {
    let root = parse_stylesheet("@font-face { font-family: x; }").unwrap();
    let Node::AtRule(at) = &root.nodes[0] else {
        panic!("expected an at-rule");
    };
    assert_eq!(at.params, "");
    assert!(at.has_block());
}

#[test]
fn test_at_rule_closed_by_enclosing_brace() {
    let root = parse_stylesheet("@media x { @charset \"utf-8\" }").unwrap();
    let Node::AtRule(media) = &root.nodes[0] else {
        panic!("expected an at-rule");
    };
    let inner = media.nodes.as_ref().unwrap();
    assert!(matches!(&inner[0], Node::AtRule(at) if at.name == "charset" && !at.has_block()));
}
