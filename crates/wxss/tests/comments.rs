use wxss::parser::{Node, parse_stylesheet};

#[test]
fn test_block_comments_become_nodes() {
    let css = r#"
        .a {
            /* this is a comment */
            color: red;
        }
    "#;
    let root = parse_stylesheet(css).unwrap();
    let Node::Rule(rule) = &root.nodes[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.nodes.len(), 2);
    assert!(matches!(&rule.nodes[0], Node::Comment(c) if c.text == "this is a comment"));
}

#[test]
fn test_inline_comment_after_declaration() {
    let css = ".a { color: red; /* inline */ background: blue; }";
    let root = parse_stylesheet(css).unwrap();
    let Node::Rule(rule) = &root.nodes[0] else {
        panic!("expected a rule");
    };
    let declarations: Vec<_> = rule
        .nodes
        .iter()
        .filter_map(|n| match n {
            Node::Declaration(d) => Some(d.prop.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(declarations, vec!["color", "background"]);
}

#[test]
fn test_comment_between_rules() {
    let css = r#"
        .a { color: red; }
        /* Comment between rules */
        .b { color: blue; }
    "#;
    let root = parse_stylesheet(css).unwrap();
    assert_eq!(root.nodes.len(), 3);
    assert!(matches!(root.nodes[1], Node::Comment(_)));
}

#[test]
fn test_braces_inside_comments_are_ignored() {
    let css = ".a { color: /* } */ red; }";
    let root = parse_stylesheet(css).unwrap();
    let Node::Rule(rule) = &root.nodes[0] else {
        panic!("expected a rule");
    };
    let Node::Declaration(decl) = &rule.nodes[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.value, "/* } */ red");
}
