use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rsense_primitives::{TextBuffer, TextEdit};

use super::*;

struct Doc {
	buffer: TextBuffer,
	tree: SyntaxTree,
	manager: TreeManager,
}

impl Doc {
	fn new(text: &str) -> Self {
		let buffer = TextBuffer::new(text);
		let tree = parse(&buffer.snapshot()).unwrap();
		Self {
			buffer,
			tree,
			manager: TreeManager::default(),
		}
	}

	fn edit(&mut self, edit: TextEdit) -> UpdateOutcome {
		let applied = self.buffer.apply(edit).unwrap();
		let snapshot = self.buffer.snapshot();
		let result = self.manager.update(&self.tree, &applied, &snapshot).unwrap();
		self.tree = result.tree;
		result.outcome
	}

	fn assert_matches_full_parse(&self) {
		let fresh = parse(&self.buffer.snapshot()).unwrap();
		assert_eq!(self.tree.shape(), fresh.shape());
		assert_eq!(self.tree.strings(), fresh.strings());
		assert_eq!(self.tree.comments(), fresh.comments());
		assert_eq!(self.tree.version(), self.buffer.version());
	}
}

#[test]
fn test_identifier_edit_is_spliced() {
	let mut doc = Doc::new("x <- foo(a, b)\ny <- 2\n");
	assert_eq!(doc.edit(TextEdit::insert(8, "bar")), UpdateOutcome::Incremental);
	assert_eq!(doc.buffer.text(), "x <- foobar(a, b)\ny <- 2\n");
	doc.assert_matches_full_parse();

	let callee = doc.tree.call_at(13).unwrap().callee().unwrap();
	assert_eq!(callee.text(), "foobar");
}

#[test]
fn test_insert_at_identifier_start() {
	let mut doc = Doc::new("f(x)");
	assert_eq!(doc.edit(TextEdit::insert(2, "my_")), UpdateOutcome::Incremental);
	doc.assert_matches_full_parse();
}

#[test]
fn test_number_and_string_interior_edits() {
	let mut doc = Doc::new("x <- 12\ny <- \"hello\"\n");
	assert_eq!(doc.edit(TextEdit::insert(7, "5")), UpdateOutcome::Incremental);
	assert_eq!(doc.edit(TextEdit::replace(TextRange::new(16, 19), "ipp")), UpdateOutcome::Incremental);
	assert_eq!(doc.buffer.text(), "x <- 125\ny <- \"hippo\"\n");
	doc.assert_matches_full_parse();
}

#[test]
fn test_comment_edit_is_spliced() {
	let mut doc = Doc::new("f(a, # first\n  b)\n");
	assert_eq!(doc.edit(TextEdit::insert(12, " arg")), UpdateOutcome::Incremental);
	doc.assert_matches_full_parse();
	assert_eq!(doc.tree.comments()[0].range, TextRange::new(5, 16));
}

#[test]
fn test_structural_edits_reparse() {
	let mut doc = Doc::new("f(a)\n");
	assert_eq!(
		doc.edit(TextEdit::insert(3, ", b")),
		UpdateOutcome::Full(FullReparseReason::StructuralEdit)
	);
	assert_eq!(
		doc.edit(TextEdit::insert(0, "# ")),
		UpdateOutcome::Full(FullReparseReason::StructuralEdit)
	);
	doc.assert_matches_full_parse();
	assert_eq!(doc.tree.comments().len(), 1);
}

#[test]
fn test_keyword_formed_by_edit_reparses() {
	let mut doc = Doc::new("functio\n");
	assert_eq!(
		doc.edit(TextEdit::insert(7, "n")),
		UpdateOutcome::Full(FullReparseReason::RelexMismatch)
	);
	assert_eq!(doc.tree.root().child(0).unwrap().kind(), SyntaxKind::FunctionDefinition);
}

#[test]
fn test_deleting_whole_identifier_reparses() {
	let mut doc = Doc::new("a + bc");
	assert_eq!(
		doc.edit(TextEdit::delete(TextRange::new(4, 6))),
		UpdateOutcome::Full(FullReparseReason::RelexMismatch)
	);
	doc.assert_matches_full_parse();
}

#[test]
fn test_escape_shift_inside_string_reparses() {
	let mut doc = Doc::new("x <- \"a\\\"b\"\n");
	let outcome = doc.edit(TextEdit::insert(8, "z"));
	assert_eq!(outcome, UpdateOutcome::Full(FullReparseReason::RelexMismatch));
	doc.assert_matches_full_parse();
}

#[test]
fn test_noop_edit_reuses_structure() {
	let mut doc = Doc::new("x <- 1");
	assert_eq!(doc.edit(TextEdit::insert(3, "")), UpdateOutcome::Reused);
	assert_eq!(doc.tree.version(), 1);
	doc.assert_matches_full_parse();
}

#[test]
fn test_disabled_manager_always_reparses() {
	let mut doc = Doc::new("foo");
	doc.manager = TreeManager::new(false);
	assert_eq!(doc.edit(TextEdit::insert(3, "d")), UpdateOutcome::Full(FullReparseReason::Disabled));
	assert_eq!(doc.manager.metrics().full_count(), 1);
}

#[test]
fn test_version_gap_reparses() {
	let mut doc = Doc::new("foo");
	let stale = doc.tree.clone();
	doc.edit(TextEdit::insert(3, "d"));
	let applied = doc.buffer.insert(4, "e").unwrap();
	let result = doc.manager.update(&stale, &applied, &doc.buffer.snapshot()).unwrap();
	assert_eq!(result.outcome, UpdateOutcome::Full(FullReparseReason::VersionGap));
	assert_eq!(result.tree.root().text(), "foode");
}

#[test]
fn test_nul_insertion_is_fatal() {
	let mut doc = Doc::new("abc");
	let applied = doc.buffer.insert(1, "\0").unwrap();
	let err = doc.manager.update(&doc.tree, &applied, &doc.buffer.snapshot()).unwrap_err();
	assert_eq!(err, crate::ParseError::InvalidEncoding { offset: 1 });
}

#[test]
fn test_nul_inside_comment_is_fatal() {
	let mut doc = Doc::new("x # note\n");
	let applied = doc.buffer.insert(5, "\0").unwrap();
	let err = doc.manager.update(&doc.tree, &applied, &doc.buffer.snapshot()).unwrap_err();
	assert_eq!(err, crate::ParseError::InvalidEncoding { offset: 5 });
	assert_eq!(doc.manager.metrics().incremental_count(), 0);
}

#[test]
fn test_metrics_track_outcomes() {
	let mut doc = Doc::new("abc(d)");
	doc.edit(TextEdit::insert(1, "x"));
	doc.edit(TextEdit::insert(0, "("));
	let metrics = doc.manager.metrics();
	assert_eq!(metrics.incremental_count(), 1);
	assert_eq!(metrics.full_count(), 1);
	assert_eq!(metrics.reason_count(FullReparseReason::StructuralEdit), 1);
}

const SEED: &str = "x <- as.matrix(data, nrow = 2)\n# helper\nf <- function(a, b = \"s t\") {\n  g(a, b)\n}\ny[[1]] <- f(1.5, 'q')\n";

proptest! {
	#[test]
	fn prop_updates_match_full_parse(
		ops in prop::collection::vec((0usize..120, 0usize..4, "[a-z0-9_. (),#\"\n{}=]{0,3}"), 1..25),
	) {
		let mut doc = Doc::new(SEED);
		for (start, len, text) in ops {
			let doc_len = doc.buffer.len();
			let start = start % (doc_len + 1);
			let len = len.min(doc_len - start);
			doc.edit(TextEdit::replace(TextRange::at(start, len), text));

			prop_assert!(doc.tree.validate().is_ok(), "{:?}", doc.tree.validate());
			let fresh = parse(&doc.buffer.snapshot()).unwrap();
			prop_assert_eq!(doc.tree.shape(), fresh.shape());
			prop_assert_eq!(doc.tree.strings(), fresh.strings());
			prop_assert_eq!(doc.tree.comments(), fresh.comments());
		}
	}

	#[test]
	fn prop_identifier_typing_stays_incremental(text in "[a-z]{1,8}") {
		let mut doc = Doc::new("value <- compute(input)\n");
		for (i, ch) in text.chars().enumerate() {
			let outcome = doc.edit(TextEdit::insert(16 + i, ch.to_string()));
			prop_assert_eq!(outcome, UpdateOutcome::Incremental);
		}
		doc.assert_matches_full_parse();
	}
}
