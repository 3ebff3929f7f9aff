//! Auto-closing of brackets and quotes.

use rsense_primitives::CharIdx;
use rsense_syntax::SyntaxTree;

/// A closing character to insert after a typed opening one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceCompletion {
	pub opening: char,
	pub closing: char,
	/// Where the opening character is typed.
	pub position: CharIdx,
}

impl BraceCompletion {
	/// Closing partner of `opening`, if it is auto-closed.
	pub const fn closing_for(opening: char) -> Option<char> {
		match opening {
			'{' => Some('}'),
			'[' => Some(']'),
			'(' => Some(')'),
			'\'' => Some('\''),
			'"' => Some('"'),
			'`' => Some('`'),
			_ => None,
		}
	}

	/// Offers a closing character unless `position` is inside a string or
	/// comment.
	pub fn try_create(tree: &SyntaxTree, position: CharIdx, opening: char) -> Option<Self> {
		let closing = Self::closing_for(opening)?;
		if position > tree.snapshot().len() || tree.is_position_in_string_or_comment(position) {
			return None;
		}
		Some(Self {
			opening,
			closing,
			position,
		})
	}
}
