use pretty_assertions::assert_eq;
use rsense_primitives::Snapshot;
use rsense_syntax::{SyntaxTree, parse};

use super::*;

fn formals(names: &[&str]) -> Vec<FormalParameter> {
	names.iter().map(|&n| FormalParameter::new(n)).collect()
}

/// Parses `text` with `|` marking the caret and returns the written
/// arguments of the call around it.
fn written(text: &str) -> WrittenArguments {
	let caret = text.find('|').unwrap();
	let source = text.replace('|', "");
	let tree: SyntaxTree = parse(&Snapshot::new(&source, 0)).unwrap();
	let list = tree.call_at(caret).unwrap().arguments().unwrap();
	WrittenArguments::from_list(list, caret)
}

fn current(text: &str, names: &[&str]) -> Option<String> {
	let formals = formals(names);
	written(text)
		.current_parameter(&formals)
		.map(|i| formals[i].name.clone())
}

#[test]
fn test_slots_split_at_commas() {
	let args = written("f(a, b = 1, |c)");
	assert_eq!(args.slots, vec![None, Some("b".to_string()), None]);
	assert_eq!(args.caret, 2);

	let args = written("f(|)");
	assert_eq!(args.slots, vec![None]);
	assert_eq!(args.caret, 0);

	let args = written("f(a|, b)");
	assert_eq!(args.caret, 0);
	let args = written("f(a,| b)");
	assert_eq!(args.caret, 1);
}

#[test]
fn test_named_argument_is_skipped_by_position() {
	assert_eq!(current("f(a, b = 1, |c)", &["a", "b", "c", "d"]).as_deref(), Some("c"));
}

#[test]
fn test_empty_list_binds_first_formal() {
	assert_eq!(current("f( | )", &["a", "b"]).as_deref(), Some("a"));
	assert_eq!(current("f(|)", &[]), None);
}

#[test]
fn test_caret_on_named_argument() {
	let names = ["data", "nrow", "ncol", "..."];
	assert_eq!(current("f(ncol = |)", &names).as_deref(), Some("ncol"));
	assert_eq!(current("f(nr = 1|)", &names).as_deref(), Some("nrow"));
	// `n` is ambiguous between nrow and ncol.
	assert_eq!(current("f(n = |)", &names).as_deref(), Some("..."));
	assert_eq!(current("f(other = |)", &["a", "b"]), None);
}

#[test]
fn test_partial_matching_stops_at_sink() {
	let names = ["x", "...", "collapse"];
	// Formals after `...` match only by exact name.
	assert_eq!(current("f(col = |)", &names).as_deref(), Some("..."));
	assert_eq!(current("f(collapse = |)", &names).as_deref(), Some("collapse"));
}

#[test]
fn test_sink_absorbs_extra_positionals() {
	let names = ["x", "...", "sep"];
	assert_eq!(current("paste(a, b, |c)", &names).as_deref(), Some("..."));
	assert_eq!(current("paste(|a)", &names).as_deref(), Some("x"));
	assert_eq!(current("f(1, 2, |3)", &["a", "b"]), None);
}

#[test]
fn test_named_before_caret_consumes_formal() {
	assert_eq!(current("f(b = 2, |)", &["a", "b", "c"]).as_deref(), Some("a"));
	assert_eq!(current("f(a = 1, 2, |)", &["a", "b", "c"]).as_deref(), Some("c"));
}

#[test]
fn test_string_names() {
	assert_eq!(current("f(\"b\" = 1, |)", &["a", "b"]).as_deref(), Some("a"));
}
