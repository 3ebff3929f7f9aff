use rsense_primitives::{CharIdx, TextRange};
use thiserror::Error;

/// Fatal parse failures.
///
/// Malformed R is never an error here; it becomes `Error` nodes and
/// [`Diagnostic`] entries on the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	/// The text contains a character R source cannot contain.
	#[error("invalid encoding: embedded NUL at offset {offset}")]
	InvalidEncoding { offset: CharIdx },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// A recoverable syntax problem recorded during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub range: TextRange,
	pub message: &'static str,
}

/// A broken structural invariant found by [`SyntaxTree::validate`].
///
/// [`SyntaxTree::validate`]: crate::SyntaxTree::validate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeViolation {
	#[error("node {node} range {range:?} exceeds text length {len}")]
	OutOfBounds { node: usize, range: TextRange, len: usize },
	#[error("child {child} range {child_range:?} escapes parent {parent} range {parent_range:?}")]
	Escapes {
		parent: usize,
		parent_range: TextRange,
		child: usize,
		child_range: TextRange,
	},
	#[error("children {left} and {right} of node {parent} overlap or are out of order")]
	Overlap { parent: usize, left: usize, right: usize },
	#[error("node {node} has a wrong parent link")]
	ParentLink { node: usize },
	#[error("root range {range:?} does not span the text (length {len})")]
	Root { range: TextRange, len: usize },
	#[error("index entry {range:?} is out of order or out of bounds")]
	Index { range: TextRange },
}
