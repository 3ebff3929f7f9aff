//! Per-query context binding a position to one snapshot and its tree.

use std::fmt;
use std::sync::Arc;

use rsense_primitives::{BufferError, CharIdx, Snapshot, TextRange};
use rsense_syntax::lexer::is_ident_char;
use rsense_syntax::{Node, SyntaxKind, SyntaxTree};

/// Identifies an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for DocumentId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

/// Everything a provider needs for one query.
///
/// The tree is captured when the query starts, so later edits to the live
/// document never reach a running query.
#[derive(Debug, Clone)]
pub struct IntellisenseContext {
	document: DocumentId,
	position: CharIdx,
	tree: Arc<SyntaxTree>,
}

impl IntellisenseContext {
	/// Binds `position` to `tree`. Positions past the end of the text are
	/// rejected.
	pub fn new(document: DocumentId, tree: Arc<SyntaxTree>, position: CharIdx) -> Result<Self, BufferError> {
		let len = tree.snapshot().len();
		if position > len {
			return Err(BufferError::OutOfRange {
				start: position,
				end: position,
				len,
			});
		}
		Ok(Self { document, position, tree })
	}

	pub fn document(&self) -> &DocumentId {
		&self.document
	}

	pub fn position(&self) -> CharIdx {
		self.position
	}

	pub fn tree(&self) -> &SyntaxTree {
		&self.tree
	}

	pub fn snapshot(&self) -> &Snapshot {
		self.tree.snapshot()
	}

	pub fn version(&self) -> u64 {
		self.tree.version()
	}

	/// Returns true when the position is inside a string or comment, where
	/// no intelligence is offered.
	pub fn is_vetoed(&self) -> bool {
		self.tree.is_position_in_string_or_comment(self.position)
	}

	/// Identifier characters immediately left of the position.
	pub fn identifier_prefix(&self) -> (String, TextRange) {
		let mut prefix: Vec<char> = self
			.snapshot()
			.chars_before(self.position)
			.take_while(|&ch| is_ident_char(ch))
			.collect();
		prefix.reverse();
		let start = self.position - prefix.len();
		(prefix.into_iter().collect(), TextRange::new(start, self.position))
	}

	/// Returns true if the prefix follows `$` or `@`.
	pub fn is_member_access(&self) -> bool {
		let (_, range) = self.identifier_prefix();
		range
			.start()
			.checked_sub(1)
			.and_then(|i| self.snapshot().char_at(i))
			.is_some_and(|ch| matches!(ch, '$' | '@'))
	}

	/// Identifier under the position, or the one ending right before it.
	pub fn identifier_at(&self) -> Option<Node<'_>> {
		let is_identifier = |n: &Node<'_>| n.kind() == SyntaxKind::Identifier;
		self.tree
			.node_at(self.position)
			.filter(|n| is_identifier(n) && n.range().contains(self.position))
			.or_else(|| {
				self.position
					.checked_sub(1)
					.and_then(|prev| self.tree.node_at(prev))
					.filter(|n| is_identifier(n) && n.range().end() == self.position)
			})
	}
}
