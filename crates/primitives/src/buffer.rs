//! Versioned text buffer.
//!
//! A [`TextBuffer`] holds the live, mutable text of one document. Every
//! accepted mutation bumps the version by one and returns an
//! [`AppliedEdit`] describing what changed. Readers never look at the live
//! buffer directly: they take a [`Snapshot`], an immutable view of one
//! version that stays valid while the buffer keeps moving.
//!
//! Offsets are character indices. An offset computed against one version is
//! meaningless for any other version.

use ropey::Rope;
use tracing::trace;

use crate::edit::{AppliedEdit, TextEdit};
use crate::error::{BufferError, Result};
use crate::position::{LineCol, OffsetEncoding};
use crate::range::{CharIdx, TextRange};
use crate::rope::{char_to_line_col, line_col_to_char};

/// Immutable text content at one buffer version.
///
/// Cloning is O(1); the underlying rope is shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
	text: Rope,
	version: u64,
}

impl Snapshot {
	/// Creates a snapshot of `text` at `version`.
	pub fn new(text: &str, version: u64) -> Self {
		Self {
			text: Rope::from_str(text),
			version,
		}
	}

	/// Version this snapshot was captured at.
	#[inline]
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Length in characters.
	#[inline]
	pub fn len(&self) -> usize {
		self.text.len_chars()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.text.len_chars() == 0
	}

	/// Number of lines, including the empty line after a trailing newline.
	#[inline]
	pub fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	/// Underlying rope.
	#[inline]
	pub fn rope(&self) -> &Rope {
		&self.text
	}

	/// Character at `offset`, if any.
	#[inline]
	pub fn char_at(&self, offset: CharIdx) -> Option<char> {
		(offset < self.len()).then(|| self.text.char(offset))
	}

	/// Text in `range`, clamped to the snapshot bounds.
	pub fn slice(&self, range: TextRange) -> String {
		let len = self.len();
		let start = range.start().min(len);
		let end = range.end().min(len);
		self.text.slice(start..end).to_string()
	}

	/// Entire content as a string.
	pub fn text(&self) -> String {
		self.text.to_string()
	}

	/// Iterates characters from `offset` backwards (excluding `offset` itself).
	pub fn chars_before(&self, offset: CharIdx) -> impl Iterator<Item = char> + '_ {
		let offset = offset.min(self.len());
		let mut chars = self.text.chars_at(offset);
		std::iter::from_fn(move || chars.prev())
	}

	/// Converts a character-column position to an offset.
	pub fn to_offset(&self, pos: LineCol) -> Result<CharIdx> {
		self.offset_at(pos, OffsetEncoding::Utf32)
	}

	/// Converts an offset to a character-column position.
	pub fn to_line_col(&self, offset: CharIdx) -> Result<LineCol> {
		self.line_col_at(offset, OffsetEncoding::Utf32)
	}

	/// Converts a position with columns in `encoding` units to an offset.
	pub fn offset_at(&self, pos: LineCol, encoding: OffsetEncoding) -> Result<CharIdx> {
		line_col_to_char(self.text.slice(..), pos, encoding).ok_or(BufferError::PositionOutOfRange {
			line: pos.line,
			column: pos.column,
		})
	}

	/// Converts an offset to a position with columns in `encoding` units.
	pub fn line_col_at(&self, offset: CharIdx, encoding: OffsetEncoding) -> Result<LineCol> {
		char_to_line_col(self.text.slice(..), offset, encoding).ok_or(BufferError::OutOfRange {
			start: offset,
			end: offset,
			len: self.len(),
		})
	}
}

/// Mutable, versioned text of one document.
#[derive(Debug, Clone)]
pub struct TextBuffer {
	text: Rope,
	version: u64,
}

impl Default for TextBuffer {
	fn default() -> Self {
		Self::new("")
	}
}

impl TextBuffer {
	/// Creates a buffer at version 0.
	pub fn new(text: &str) -> Self {
		Self {
			text: Rope::from_str(text),
			version: 0,
		}
	}

	/// Current version. Starts at 0 and grows by one per accepted edit.
	#[inline]
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Length in characters.
	#[inline]
	pub fn len(&self) -> usize {
		self.text.len_chars()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.text.len_chars() == 0
	}

	/// Captures an immutable snapshot of the current version.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			text: self.text.clone(),
			version: self.version,
		}
	}

	/// Entire content as a string.
	pub fn text(&self) -> String {
		self.text.to_string()
	}

	/// Inserts `text` at `offset`.
	pub fn insert(&mut self, offset: CharIdx, text: &str) -> Result<AppliedEdit> {
		self.apply(TextEdit::insert(offset, text))
	}

	/// Deletes `range`.
	pub fn delete(&mut self, range: TextRange) -> Result<AppliedEdit> {
		self.apply(TextEdit::delete(range))
	}

	/// Replaces `range` with `text`.
	pub fn replace(&mut self, range: TextRange, text: &str) -> Result<AppliedEdit> {
		self.apply(TextEdit::replace(range, text))
	}

	/// Replaces the whole content.
	pub fn set_text(&mut self, text: &str) -> AppliedEdit {
		let edit = TextEdit::replace(TextRange::new(0, self.len()), text);
		self.commit(edit)
	}

	/// Applies an edit computed against `version`.
	///
	/// Fails with [`BufferError::VersionMismatch`] if `version` is not the
	/// current version; the buffer is left untouched.
	pub fn apply_at(&mut self, version: u64, edit: TextEdit) -> Result<AppliedEdit> {
		if version != self.version {
			return Err(BufferError::VersionMismatch {
				expected: version,
				actual: self.version,
			});
		}
		self.apply(edit)
	}

	/// Applies an edit against the current version.
	pub fn apply(&mut self, edit: TextEdit) -> Result<AppliedEdit> {
		let len = self.len();
		let end = edit.start.checked_add(edit.deleted_len);
		match end {
			Some(end) if end <= len => Ok(self.commit(edit)),
			_ => Err(BufferError::OutOfRange {
				start: edit.start,
				end: end.unwrap_or(usize::MAX),
				len,
			}),
		}
	}

	/// Converts a character-column position to an offset.
	pub fn to_offset(&self, pos: LineCol) -> Result<CharIdx> {
		line_col_to_char(self.text.slice(..), pos, OffsetEncoding::Utf32).ok_or(BufferError::PositionOutOfRange {
			line: pos.line,
			column: pos.column,
		})
	}

	/// Converts an offset to a character-column position.
	pub fn to_line_col(&self, offset: CharIdx) -> Result<LineCol> {
		char_to_line_col(self.text.slice(..), offset, OffsetEncoding::Utf32).ok_or(BufferError::OutOfRange {
			start: offset,
			end: offset,
			len: self.len(),
		})
	}

	fn commit(&mut self, edit: TextEdit) -> AppliedEdit {
		let range = edit.old_range();
		let deleted_text = self.text.slice(range.as_range()).to_string();
		if !range.is_empty() {
			self.text.remove(range.as_range());
		}
		if !edit.text.is_empty() {
			self.text.insert(edit.start, &edit.text);
		}

		let version_before = self.version;
		self.version += 1;
		trace!(
			version = self.version,
			start = edit.start,
			deleted = edit.deleted_len,
			inserted = edit.text.len(),
			"buffer.edit"
		);

		AppliedEdit {
			edit,
			deleted_text,
			version_before,
			version_after: self.version,
		}
	}
}
