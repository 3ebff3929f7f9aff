//! Error types for buffer mutation and position mapping.

use thiserror::Error;

use crate::range::CharIdx;

/// Errors raised by [`TextBuffer`](crate::TextBuffer) and [`Snapshot`](crate::Snapshot).
///
/// A failed operation never modifies the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
	/// An offset or range lies outside `[0, len]`.
	#[error("range {start}..{end} is outside buffer bounds 0..{len}")]
	OutOfRange {
		/// Requested start offset.
		start: CharIdx,
		/// Requested end offset.
		end: CharIdx,
		/// Buffer length at the time of the request.
		len: usize,
	},

	/// A line/column pair does not address a character in the buffer.
	#[error("position {line}:{column} is outside the buffer")]
	PositionOutOfRange {
		/// Requested line.
		line: usize,
		/// Requested column.
		column: usize,
	},

	/// An edit was submitted against a buffer version that is no longer current.
	#[error("edit targets version {expected} but the buffer is at version {actual}")]
	VersionMismatch {
		/// Version the edit was computed against.
		expected: u64,
		/// Current buffer version.
		actual: u64,
	},
}

impl BufferError {
	/// Returns true for both offset and line/column range violations.
	pub fn is_out_of_range(&self) -> bool {
		matches!(self, Self::OutOfRange { .. } | Self::PositionOutOfRange { .. })
	}
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
