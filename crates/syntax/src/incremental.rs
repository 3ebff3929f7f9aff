//! Incremental tree maintenance.
//!
//! After each accepted edit the [`TreeManager`] produces a tree for the new
//! snapshot. Edits confined to one identifier, number, string interior or
//! comment are spliced into a copy of the previous tree; everything else is
//! a full reparse. A spliced tree is validated before it is returned and any
//! failed check falls back to a full reparse.

use std::time::Instant;

use rsense_primitives::rope::is_line_break;
use rsense_primitives::{AppliedEdit, Snapshot, TextRange};
use tracing::{debug, warn};

use crate::error::Result;
use crate::kind::{SyntaxKind, TokenKind};
use crate::lexer::{is_ident_char, tokenize};
use crate::metrics::UpdateMetrics;
use crate::parser::parse;
use crate::tree::{Node, SyntaxTree};

/// How a tree update was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
	/// The edit changed nothing; the structure was reused as is.
	Reused,
	/// A single leaf or comment was spliced.
	Incremental,
	/// The whole text was reparsed.
	Full(FullReparseReason),
}

impl UpdateOutcome {
	pub const fn is_incremental(self) -> bool {
		matches!(self, Self::Reused | Self::Incremental)
	}
}

/// Why the local path was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullReparseReason {
	/// Incremental updates are switched off.
	Disabled,
	/// The edit does not connect the tree's version to the new snapshot.
	VersionGap,
	/// The edit touches more than one leaf, or a structural character.
	StructuralEdit,
	/// Re-lexing the edited leaf changed its token shape.
	RelexMismatch,
	/// The spliced tree broke a structural invariant.
	ValidationFailed,
}

#[derive(Debug, Clone)]
pub struct UpdateResult {
	pub tree: SyntaxTree,
	pub outcome: UpdateOutcome,
}

/// Produces trees for successive snapshots of one document.
#[derive(Debug, Clone)]
pub struct TreeManager {
	incremental: bool,
	metrics: UpdateMetrics,
}

impl Default for TreeManager {
	fn default() -> Self {
		Self::new(true)
	}
}

impl TreeManager {
	/// Creates a manager; `incremental = false` forces full reparses.
	pub fn new(incremental: bool) -> Self {
		Self {
			incremental,
			metrics: UpdateMetrics::new(),
		}
	}

	pub fn metrics(&self) -> &UpdateMetrics {
		&self.metrics
	}

	/// Builds the tree for `snapshot`, the result of applying `applied` to
	/// the text `tree` was built from.
	pub fn update(&mut self, tree: &SyntaxTree, applied: &AppliedEdit, snapshot: &Snapshot) -> Result<UpdateResult> {
		let started = Instant::now();

		let local = if !self.incremental {
			Err(FullReparseReason::Disabled)
		} else if applied.version_before != tree.version() || applied.version_after != snapshot.version() {
			Err(FullReparseReason::VersionGap)
		} else {
			splice(tree, applied, snapshot)
		};

		let result = match local {
			Ok(result) => result,
			Err(reason) => UpdateResult {
				tree: parse(snapshot)?,
				outcome: UpdateOutcome::Full(reason),
			},
		};

		let elapsed = started.elapsed();
		self.metrics.record(result.outcome, elapsed);
		debug!(
			version = snapshot.version(),
			outcome = ?result.outcome,
			elapsed_us = elapsed.as_micros() as u64,
			"syntax.update"
		);
		Ok(result)
	}
}

/// Region of the old tree that absorbs the edit.
enum Target {
	Leaf(TokenKind, TextRange),
	Comment(TextRange),
}

fn splice(tree: &SyntaxTree, applied: &AppliedEdit, snapshot: &Snapshot) -> std::result::Result<UpdateResult, FullReparseReason> {
	let edit = &applied.edit;
	if edit.is_noop() {
		let mut next = tree.clone();
		next.snapshot = snapshot.clone();
		return Ok(UpdateResult {
			tree: next,
			outcome: UpdateOutcome::Reused,
		});
	}

	let old = edit.old_range();
	let target = find_target(tree, old, &applied.deleted_text, &edit.text)?;
	let delta = edit.delta();

	if let Target::Leaf(kind, range) = target {
		relex_check(snapshot, kind, range.resized(delta))?;
	}
	let target_range = match target {
		Target::Leaf(_, range) | Target::Comment(range) => range,
	};

	let mut next = tree.clone();
	next.snapshot = snapshot.clone();
	for node in &mut next.nodes {
		node.range = patch(node.range, target_range, delta).ok_or(FullReparseReason::ValidationFailed)?;
	}
	for string in &mut next.strings {
		string.range = patch(string.range, target_range, delta).ok_or(FullReparseReason::ValidationFailed)?;
	}
	for comment in &mut next.comments {
		comment.range = patch(comment.range, target_range, delta).ok_or(FullReparseReason::ValidationFailed)?;
	}
	for diagnostic in &mut next.diagnostics {
		diagnostic.range = patch(diagnostic.range, target_range, delta).ok_or(FullReparseReason::ValidationFailed)?;
	}

	if let Err(violation) = next.validate() {
		warn!(version = snapshot.version(), %violation, "syntax.splice_invalid");
		return Err(FullReparseReason::ValidationFailed);
	}

	Ok(UpdateResult {
		tree: next,
		outcome: UpdateOutcome::Incremental,
	})
}

/// New range for `range` when `target` grows by `delta`.
fn patch(range: TextRange, target: TextRange, delta: isize) -> Option<TextRange> {
	if range.contains_range(target) {
		Some(range.resized(delta))
	} else if range.start() >= target.end() {
		Some(range.shifted(delta))
	} else if range.end() <= target.start() {
		Some(range)
	} else {
		None
	}
}

fn find_target(tree: &SyntaxTree, old: TextRange, deleted: &str, inserted: &str) -> std::result::Result<Target, FullReparseReason> {
	let changed = || deleted.chars().chain(inserted.chars());

	let idx = tree.comments.partition_point(|c| c.range.start() < old.start());
	if let Some(comment) = idx.checked_sub(1).map(|i| tree.comments[i])
		&& old.end() <= comment.range.end()
	{
		// A NUL goes through the full parse so it surfaces as an encoding error.
		if changed().any(is_line_break) || inserted.contains('\0') {
			return Err(FullReparseReason::StructuralEdit);
		}
		return Ok(Target::Comment(comment.range));
	}

	let leaf = candidate_leaves(tree, old.start())
		.into_iter()
		.flatten()
		.find(|leaf| leaf.range().contains_range(old) && is_splicable(*leaf, old))
		.ok_or(FullReparseReason::StructuralEdit)?;
	let kind = leaf.token().ok_or(FullReparseReason::StructuralEdit)?;

	let allowed = match leaf.kind() {
		SyntaxKind::String => changed().all(|ch| !matches!(ch, '"' | '\'' | '`' | '\\') && !is_line_break(ch)),
		_ => changed().all(is_ident_char),
	};
	if !allowed {
		return Err(FullReparseReason::StructuralEdit);
	}
	Ok(Target::Leaf(kind, leaf.range()))
}

/// The leaf containing `offset` and the leaf ending at it.
fn candidate_leaves(tree: &SyntaxTree, offset: usize) -> [Option<Node<'_>>; 2] {
	let containing = tree.node_at(offset).filter(Node::is_leaf);
	let ending = offset
		.checked_sub(1)
		.and_then(|prev| tree.node_at(prev))
		.filter(|n| n.is_leaf() && n.range().end() == offset);
	[containing, ending]
}

fn is_splicable(leaf: Node<'_>, old: TextRange) -> bool {
	match leaf.kind() {
		SyntaxKind::Identifier => !leaf.text().starts_with('`'),
		SyntaxKind::Number => true,
		SyntaxKind::String => {
			let range = leaf.range();
			let quoted = leaf.text().starts_with(['"', '\'']);
			let terminated = leaf
				.tree()
				.strings()
				.iter()
				.any(|s| s.range == range && s.terminated);
			quoted && terminated && range.start() < old.start() && old.end() < range.end()
		}
		_ => false,
	}
}

/// Re-lexes the edited leaf in the new text and checks it is still one token
/// of the same kind that cannot merge with its neighbours.
fn relex_check(snapshot: &Snapshot, kind: TokenKind, range: TextRange) -> std::result::Result<(), FullReparseReason> {
	let chars: Vec<char> = snapshot.slice(range).chars().collect();
	let tokens = tokenize(&chars, range.start()).map_err(|_| FullReparseReason::RelexMismatch)?;
	let [token] = tokens.as_slice() else {
		return Err(FullReparseReason::RelexMismatch);
	};
	if token.kind != kind || token.range != range || !token.terminated {
		return Err(FullReparseReason::RelexMismatch);
	}

	// A preceding `r` could turn a string into a raw string.
	let before = range.start().checked_sub(1).and_then(|i| snapshot.char_at(i));
	if before.is_some_and(is_ident_char) {
		return Err(FullReparseReason::RelexMismatch);
	}
	let after = snapshot.char_at(range.end());
	if kind != TokenKind::String && after.is_some_and(|ch| is_ident_char(ch) || matches!(ch, '"' | '\'')) {
		return Err(FullReparseReason::RelexMismatch);
	}
	Ok(())
}

#[cfg(test)]
mod tests;
