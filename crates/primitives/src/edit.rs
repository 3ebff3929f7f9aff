//! Text edit descriptors.
//!
//! A [`TextEdit`] replaces `deleted_len` characters at `start` with `text`.
//! It is meaningful against exactly one buffer version; applying it produces
//! the next version and an [`AppliedEdit`] that dependents (syntax trees,
//! open query contexts) use to catch up.

use crate::range::{CharIdx, CharLen, TextRange};

/// A single atomic replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
	/// Character offset where the edit begins.
	pub start: CharIdx,
	/// Number of characters removed at `start`.
	pub deleted_len: CharLen,
	/// Text inserted at `start` after the deletion.
	pub text: String,
}

impl TextEdit {
	/// Pure insertion at `offset`.
	pub fn insert(offset: CharIdx, text: impl Into<String>) -> Self {
		Self {
			start: offset,
			deleted_len: 0,
			text: text.into(),
		}
	}

	/// Pure deletion of `range`.
	pub fn delete(range: TextRange) -> Self {
		Self {
			start: range.start(),
			deleted_len: range.len(),
			text: String::new(),
		}
	}

	/// Replacement of `range` with `text`.
	pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
		Self {
			start: range.start(),
			deleted_len: range.len(),
			text: text.into(),
		}
	}

	/// Number of characters inserted.
	pub fn inserted_len(&self) -> CharLen {
		self.text.chars().count()
	}

	/// Range replaced, in pre-edit coordinates.
	pub fn old_range(&self) -> TextRange {
		TextRange::at(self.start, self.deleted_len)
	}

	/// Range of the inserted text, in post-edit coordinates.
	pub fn new_range(&self) -> TextRange {
		TextRange::at(self.start, self.inserted_len())
	}

	/// Net change in document length.
	pub fn delta(&self) -> isize {
		self.inserted_len() as isize - self.deleted_len as isize
	}

	/// Returns true if the edit neither deletes nor inserts anything.
	pub fn is_noop(&self) -> bool {
		self.deleted_len == 0 && self.text.is_empty()
	}
}

/// Record of an edit accepted by a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
	/// The edit as applied.
	pub edit: TextEdit,
	/// Text removed by the edit.
	pub deleted_text: String,
	/// Buffer version the edit was applied against.
	pub version_before: u64,
	/// Buffer version produced by the edit.
	pub version_after: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ranges_and_delta() {
		let edit = TextEdit::replace(TextRange::new(2, 5), "αβ");
		assert_eq!(edit.old_range(), TextRange::new(2, 5));
		assert_eq!(edit.new_range(), TextRange::new(2, 4));
		assert_eq!(edit.delta(), -1);
	}

	#[test]
	fn test_noop_detection() {
		assert!(TextEdit::insert(3, "").is_noop());
		assert!(!TextEdit::delete(TextRange::new(0, 1)).is_noop());
	}
}
