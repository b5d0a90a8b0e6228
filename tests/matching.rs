//! End-to-end matching: grammar text in, parse tree out

use rat::rat::{parse_with_grammar, GrammarLoader, Packrat, ParseError, RatError, Tree};
use rstest::rstest;
use std::path::PathBuf;

fn fixture(name: &str) -> rat::rat::Grammar {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    GrammarLoader::from_path(path).unwrap().load().unwrap()
}

/// Leaf values in document order
fn leaves(tree: &Tree) -> String {
    tree.enumerate(tree.root())
        .into_iter()
        .filter_map(|id| tree[id].attribute("value"))
        .collect()
}

#[test]
fn test_character_then_digit() {
    let tree = parse_with_grammar("thing: <character> <digit>", "12").unwrap();
    assert_eq!(tree.count(tree.root()), 3);
    assert_eq!(leaves(&tree), "12");

    assert_eq!(
        parse_with_grammar("thing: <character> <digit>", "1x").unwrap_err(),
        RatError::Parse(ParseError::Failed)
    );
}

#[test]
fn test_trailing_input_position_counts_characters() {
    assert_eq!(
        parse_with_grammar("word: <alpha>+", "héllo wörld").unwrap_err().to_string(),
        "Parse failed: trailing input at position 5."
    );
}

#[rstest]
#[case("1")]
#[case("-7")]
#[case("1+2")]
#[case("2*(3+4)")]
#[case("((1))")]
#[case("10/-2-3*4")]
fn test_arithmetic_accepts(#[case] input: &str) {
    let tree = Packrat::new().parse(&fixture("arithmetic.peg"), input).unwrap();
    assert_eq!(leaves(&tree), input);
}

#[rstest]
#[case("", ParseError::Failed)]
#[case("+", ParseError::Failed)]
#[case("(1", ParseError::Failed)]
#[case("1+", ParseError::TrailingInput { position: 1 })]
#[case("1 + 2", ParseError::TrailingInput { position: 1 })]
#[case("(1))", ParseError::TrailingInput { position: 3 })]
fn test_arithmetic_rejects(#[case] input: &str, #[case] expected: ParseError) {
    assert_eq!(
        Packrat::new().parse(&fixture("arithmetic.peg"), input).unwrap_err(),
        expected
    );
}

#[test]
fn test_arithmetic_tree_shape() {
    let tree = Packrat::new().parse(&fixture("arithmetic.peg"), "1+2").unwrap();
    let root = tree.root();
    assert_eq!(tree[root].name(), "expression");

    let names: Vec<&str> = tree[root].branches().iter().map(|b| tree[*b].name()).collect();
    assert_eq!(names, vec!["term", "tail"]);

    let op = tree.find(root, "expression/tail/addop/'+'").unwrap();
    assert!(tree[op].has_tag("charLiteral"));
    assert_eq!(tree[op].attribute("expected"), Some("'+'"));
    assert_eq!(tree.path(op), "expression/tail/addop/'+'");

    let number = tree.find(root, "expression/term/factor/number").unwrap();
    assert!(tree[number].has_tag("rule"));
}

#[test]
fn test_date_with_continued_production() {
    let grammar = fixture("date.peg");
    let packrat = Packrat::new();

    let tree = packrat.parse(&grammar, "2024-01-15T10:30:59").unwrap();
    let root = tree.root();
    assert!(tree.find(root, "datetime/time/seconds").is_some());
    assert_eq!(leaves(&tree), "2024-01-15T10:30:59");

    let tree = packrat.parse(&grammar, "2024-01-15").unwrap();
    assert!(tree.find(tree.root(), "datetime/time").is_none());

    assert!(packrat.parse(&grammar, "2024-1-15").is_err());
}

#[test]
fn test_lookahead_keywords() {
    let grammar = GrammarLoader::from_string(
        "statement: keyword\n           identifier\n\n\
         keyword: \"if\" !<alnum>\n\n\
         identifier: <alpha> <alnum>*",
    )
    .load()
    .unwrap();
    let packrat = Packrat::new();

    let tree = packrat.parse(&grammar, "if").unwrap();
    assert!(tree.find(tree.root(), "statement/keyword").is_some());

    let tree = packrat.parse(&grammar, "iffy").unwrap();
    assert!(tree.find(tree.root(), "statement/keyword").is_none());
    assert!(tree.find(tree.root(), "statement/identifier").is_some());
    assert_eq!(leaves(&tree), "iffy");
}

#[test]
fn test_string_literal_leaf() {
    let tree = parse_with_grammar("greeting: \"hello\" ' ' <alpha>+", "hello rat").unwrap();
    let first = tree[tree.root()].branches()[0];
    assert_eq!(tree[first].name(), "\"hello\"");
    assert!(tree[first].has_tag("stringLiteral"));
    assert_eq!(tree[first].attribute("value"), Some("hello"));
    assert_eq!(leaves(&tree), "hello rat");
}

#[test]
fn test_no_leaked_nodes_after_backtracking() {
    let tree = Packrat::new().parse(&fixture("arithmetic.peg"), "2*(3+4)").unwrap();
    assert_eq!(tree.len(), tree.count(tree.root()));
}
