use pretty_assertions::assert_eq;

use super::*;
use crate::parse;

fn parsed(text: &str) -> SyntaxTree {
	parse(&Snapshot::new(text, 0)).unwrap()
}

#[test]
fn test_inside_string_is_strictly_between_quotes() {
	let tree = parsed("x <- \"{not a brace}\"");
	assert!(!tree.is_position_inside_string(5));
	assert!(tree.is_position_inside_string(6));
	assert!(tree.is_position_inside_string(19));
	assert!(!tree.is_position_inside_string(20));
	assert!(!tree.is_position_inside_string(0));
}

#[test]
fn test_unterminated_string_runs_through_end() {
	let tree = parsed("f('abc");
	assert!(tree.is_position_inside_string(3));
	assert!(tree.is_position_inside_string(6));
}

#[test]
fn test_comment_containing() {
	let tree = parsed("x # hi\ny");
	assert_eq!(tree.comment_containing(2), None);
	assert_eq!(tree.comment_containing(3).map(|c| c.range), Some(TextRange::new(2, 6)));
	assert!(tree.comment_containing(6).is_some());
	assert_eq!(tree.comment_containing(7), None);
	assert!(tree.is_position_in_string_or_comment(4));
}

#[test]
fn test_node_at_prefers_deepest() {
	let tree = parsed("x <- as.matrix(x)");
	let node = tree.node_at(15).unwrap();
	assert_eq!(node.kind(), SyntaxKind::Identifier);
	assert_eq!(node.range(), TextRange::new(15, 16));
	let kinds: Vec<_> = node.ancestors().map(|n| n.kind()).collect();
	assert_eq!(kinds, vec![
		SyntaxKind::Identifier,
		SyntaxKind::Argument,
		SyntaxKind::ArgumentList,
		SyntaxKind::Call,
		SyntaxKind::Assignment,
		SyntaxKind::Root
	]);
}

#[test]
fn test_node_at_end_of_stream_descends_rightmost() {
	let tree = parsed("f(a, ");
	let node = tree.node_at(5).unwrap();
	assert_eq!(node.kind(), SyntaxKind::ArgumentList);

	let tree = parsed("f(");
	let node = tree.node_at(2).unwrap();
	assert!(node.is_token(TokenKind::LParen));
	assert!(tree.node_at(3).is_none());
}

#[test]
fn test_leaf_at_falls_back_to_leaf_ending_there() {
	let tree = parsed("foo (x)");
	assert_eq!(tree.leaf_at(3).unwrap().text(), "foo");
	assert_eq!(tree.leaf_at(4).unwrap().text(), "(");
}

#[test]
fn test_call_at_argument_span() {
	let tree = parsed("f(a, g(b))");
	assert_eq!(tree.call_at(1), None);
	assert_eq!(tree.call_at(2).unwrap().callee().unwrap().text(), "f");
	assert_eq!(tree.call_at(7).unwrap().callee().unwrap().text(), "g");
	// The closing paren position is still inside.
	assert_eq!(tree.call_at(8).unwrap().callee().unwrap().text(), "g");
	assert_eq!(tree.call_at(9).unwrap().callee().unwrap().text(), "f");
	assert_eq!(tree.call_at(10), None);
}

#[test]
fn test_call_at_unterminated_includes_end() {
	let tree = parsed("x( ");
	assert_eq!(tree.call_at(3).unwrap().callee().unwrap().text(), "x");
}

#[test]
fn test_validate_detects_broken_trees() {
	let good = parsed("f(a, b)");
	good.validate().unwrap();

	let mut escaped = good.clone();
	let leaf = escaped.leaves().last().unwrap().id();
	escaped.nodes[leaf.index()].range = TextRange::new(6, 9);
	assert!(matches!(escaped.validate(), Err(TreeViolation::OutOfBounds { .. })));

	let mut overlapping = good.clone();
	let comma = overlapping.leaves().find(|n| n.is_token(TokenKind::Comma)).unwrap().id();
	overlapping.nodes[comma.index()].range = TextRange::new(2, 4);
	assert!(matches!(overlapping.validate(), Err(TreeViolation::Overlap { .. })));

	let mut root = good;
	let id = root.root;
	root.nodes[id.index()].range = TextRange::new(0, 6);
	assert!(matches!(root.validate(), Err(TreeViolation::Root { .. })));
}

#[test]
fn test_function_definitions_in_order() {
	let tree = parsed("a <- function(x) x\nb <- \\(y) function(z) z");
	let starts: Vec<_> = tree.function_definitions().map(|n| n.range().start()).collect();
	assert_eq!(starts, vec![5, 24, 29]);
}

#[test]
fn test_ancestor_and_child_iterators_outlive_the_handle() {
	let tree = parsed("b <- \\(y) function(z) z");
	let enclosing: Vec<_> = tree
		.node_at(22)
		.into_iter()
		.flat_map(|node| node.ancestors())
		.filter(|n| n.kind() == SyntaxKind::FunctionDefinition)
		.map(|n| n.range().start())
		.collect();
	assert_eq!(enclosing, vec![10, 5]);

	let kinds: Vec<_> = tree
		.function_definitions()
		.flat_map(|definition| definition.children())
		.map(|child| child.kind())
		.filter(|kind| *kind == SyntaxKind::ParameterList)
		.collect();
	assert_eq!(kinds.len(), 2);
}
