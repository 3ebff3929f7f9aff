use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn tree(text: &str) -> SyntaxTree {
	parse(&Snapshot::new(text, 0)).unwrap()
}

/// Compact s-expression of the tree: leaves print their text.
fn sexp(tree: &SyntaxTree) -> String {
	fn walk(node: crate::Node<'_>, out: &mut String) {
		if node.is_leaf() {
			out.push_str(&node.text());
			return;
		}
		out.push('(');
		out.push_str(&format!("{:?}", node.kind()));
		for child in node.children() {
			out.push(' ');
			walk(child, out);
		}
		out.push(')');
	}
	let mut out = String::new();
	walk(tree.root(), &mut out);
	out
}

#[test]
fn test_assignment_of_call() {
	let tree = tree("x <- as.matrix(x)");
	assert_eq!(sexp(&tree), "(Root (Assignment x <- (Call as.matrix (ArgumentList ( (Argument x) )))))");
	tree.validate().unwrap();
}

#[test]
fn test_precedence() {
	assert_eq!(sexp(&tree("a + b * c")), "(Root (Binary a + (Binary b * c)))");
	assert_eq!(sexp(&tree("-a^b")), "(Root (Unary - (Binary a ^ b)))");
	assert_eq!(sexp(&tree("a <- b <- c")), "(Root (Assignment a <- (Assignment b <- c)))");
	assert_eq!(sexp(&tree("x$y(1)")), "(Root (Call (Binary x $ y) (ArgumentList ( (Argument 1) ))))");
	assert_eq!(sexp(&tree("pkg::f(x)")), "(Root (Call (Binary pkg :: f) (ArgumentList ( (Argument x) ))))");
	assert_eq!(sexp(&tree("!a == b")), "(Root (Unary ! (Binary a == b)))");
}

#[test]
fn test_named_and_empty_arguments() {
	let tree = tree("f(a, b = 1, , c =)");
	assert_eq!(
		sexp(&tree),
		"(Root (Call f (ArgumentList ( (Argument a) , (Argument b = 1) , , (Argument c =) ))))"
	);
}

#[test]
fn test_newlines_split_statements_but_not_arguments() {
	let tree = tree("f(a,\n  b)\ng\n");
	assert_eq!(sexp(&tree), "(Root (Call f (ArgumentList ( (Argument a) , (Argument b) ))) g)");
	assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_binary_operator_continues_on_next_line() {
	assert_eq!(sexp(&tree("x <-\n  1 +\n  2")), "(Root (Assignment x <- (Binary 1 + 2)))");
}

#[test]
fn test_function_definition_and_block() {
	let tree = tree("x <- function(a, b = TRUE, c = 12/7) { }");
	assert_eq!(
		sexp(&tree),
		"(Root (Assignment x <- (FunctionDefinition function (ParameterList ( (Parameter a) , (Parameter b = TRUE) , (Parameter c = (Binary 12 / 7)) )) (Block { }))))"
	);
	assert_eq!(tree.function_definitions().count(), 1);
}

#[test]
fn test_lambda_shorthand() {
	assert_eq!(
		sexp(&tree("\\(x) x + 1")),
		"(Root (FunctionDefinition \\ (ParameterList ( (Parameter x) )) (Binary x + 1)))"
	);
}

#[test]
fn test_control_flow() {
	assert_eq!(
		sexp(&tree("if (a) b else c")),
		"(Root (If if ( a ) b else c))"
	);
	assert_eq!(
		sexp(&tree("for (i in 1:10) {\n  print(i)\n}")),
		"(Root (For for ( i in (Binary 1 : 10) ) (Block { (Call print (ArgumentList ( (Argument i) ))) })))"
	);
	assert_eq!(sexp(&tree("while (TRUE) break")), "(Root (While while ( TRUE ) break))");
	assert_eq!(sexp(&tree("repeat next")), "(Root (Repeat repeat next))");
}

#[test]
fn test_else_on_next_line_inside_block() {
	assert_eq!(
		sexp(&tree("{\n  if (a) b\n  else c\n}")),
		"(Root (Block { (If if ( a ) b else c) }))"
	);
}

#[test]
fn test_double_bracket_index() {
	assert_eq!(sexp(&tree("x[[1]]")), "(Root (Index x (ArgumentList [[ (Argument 1) ] ])))");
	assert_eq!(sexp(&tree("x[i, ]")), "(Root (Index x (ArgumentList [ (Argument i) , ])))");
}

#[test]
fn test_unterminated_call_extends_to_end() {
	let tree = tree("x <- f(a, ");
	let args = tree.preorder().find(|n| n.kind() == SyntaxKind::ArgumentList).unwrap();
	assert_eq!(args.range(), TextRange::new(6, 10));
	assert!(!args.is_closed());
	assert!(!tree.diagnostics().is_empty());
	tree.validate().unwrap();
}

#[test]
fn test_unterminated_call_stops_at_enclosing_brace() {
	let tree = tree("{ f(a\n}");
	let args = tree.preorder().find(|n| n.kind() == SyntaxKind::ArgumentList).unwrap();
	assert_eq!(args.range(), TextRange::new(3, 6));
	let block = tree.root().child(0).unwrap();
	assert_eq!(block.kind(), SyntaxKind::Block);
	assert_eq!(block.range(), TextRange::new(0, 7));
	tree.validate().unwrap();
}

#[test]
fn test_stray_tokens_become_errors() {
	let tree = tree(") x\n]");
	let kinds: Vec<_> = tree.root().children().map(|n| n.kind()).collect();
	assert_eq!(kinds, vec![SyntaxKind::Error, SyntaxKind::Identifier, SyntaxKind::Error]);
	assert_eq!(tree.diagnostics().len(), 3);
	tree.validate().unwrap();
}

#[test]
fn test_comments_and_strings_are_indexed() {
	let tree = tree("x <- \"a\" # note\ny <- 'b'");
	assert_eq!(tree.strings().len(), 2);
	assert_eq!(tree.comments().len(), 1);
	assert_eq!(tree.comments()[0].range, TextRange::new(9, 15));
	assert!(tree.preorder().all(|n| !n.range().intersects(TextRange::new(9, 15))
		|| n.kind() == SyntaxKind::Root));
}

#[test]
fn test_empty_document() {
	let tree = tree("");
	assert_eq!(tree.root().range(), TextRange::new(0, 0));
	assert_eq!(tree.node_count(), 1);
	tree.validate().unwrap();
}

#[test]
fn test_nul_is_fatal() {
	let err = parse(&Snapshot::new("x\0", 0)).unwrap_err();
	assert_eq!(err, crate::ParseError::InvalidEncoding { offset: 1 });
}

#[test]
fn test_deep_nesting_is_cut_off_with_a_diagnostic() {
	let text = "(".repeat(50_000);
	let tree = parse(&Snapshot::new(&text, 0)).unwrap();
	assert_eq!(tree.validate(), Ok(()));
	assert_eq!(tree.root().range(), TextRange::new(0, 50_000));
	assert!(tree.diagnostics().iter().any(|d| d.message == "nesting too deep"));

	let text = format!("{}1{}", "x[[".repeat(20_000), "]]".repeat(20_000));
	let tree = parse(&Snapshot::new(&text, 0)).unwrap();
	assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn test_moderate_nesting_parses_without_cutoff() {
	let text = format!("{}x{}", "(".repeat(50), ")".repeat(50));
	let tree = parse(&Snapshot::new(&text, 0)).unwrap();
	assert_eq!(tree.validate(), Ok(()));
	assert!(tree.diagnostics().is_empty());
}

proptest! {
	#[test]
	fn prop_any_text_parses_to_a_valid_tree(text in "[a-c0-9 (){}\\[\\],=<\\-+\"'#\n$@:!%]{0,60}") {
		let tree = parse(&Snapshot::new(&text, 0)).unwrap();
		prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
		prop_assert_eq!(tree.root().range(), TextRange::new(0, text.chars().count()));
	}

	#[test]
	fn prop_leaves_tile_significant_text(text in "[a-c0-9 (){}\\[\\],=<\\-+\n]{0,60}") {
		let tree = parse(&Snapshot::new(&text, 0)).unwrap();
		let chars: Vec<char> = text.chars().collect();
		let mut covered = vec![false; chars.len()];
		let mut last_end = 0;
		for leaf in tree.leaves() {
			prop_assert!(leaf.range().start() >= last_end);
			last_end = leaf.range().end();
			for i in leaf.range().as_range() {
				covered[i] = true;
			}
		}
		for (i, ch) in chars.iter().enumerate() {
			prop_assert_eq!(covered[i], !ch.is_whitespace(), "offset {}", i);
		}
	}
}
