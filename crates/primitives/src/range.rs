use std::fmt;
use std::ops::Range as StdRange;

/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for rsense.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A half-open character range `[start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TextRange {
	start: CharIdx,
	end: CharIdx,
}

impl TextRange {
	/// Creates a range from `start` to `end`.
	///
	/// # Panics
	/// In debug builds, if `start > end`.
	#[inline]
	pub const fn new(start: CharIdx, end: CharIdx) -> Self {
		debug_assert!(start <= end);
		Self { start, end }
	}

	/// Creates a range from a start offset and a length.
	#[inline]
	pub const fn at(start: CharIdx, len: CharLen) -> Self {
		Self { start, end: start + len }
	}

	/// Creates an empty range at `offset`.
	#[inline]
	pub const fn empty(offset: CharIdx) -> Self {
		Self { start: offset, end: offset }
	}

	#[inline]
	pub const fn start(&self) -> CharIdx {
		self.start
	}

	#[inline]
	pub const fn end(&self) -> CharIdx {
		self.end
	}

	#[inline]
	pub const fn len(&self) -> CharLen {
		self.end - self.start
	}

	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Half-open containment: `start <= offset < end`.
	#[inline]
	pub const fn contains(&self, offset: CharIdx) -> bool {
		self.start <= offset && offset < self.end
	}

	/// Closed containment: `start <= offset <= end`.
	#[inline]
	pub const fn contains_inclusive(&self, offset: CharIdx) -> bool {
		self.start <= offset && offset <= self.end
	}

	/// Returns true if `other` lies entirely within this range.
	#[inline]
	pub const fn contains_range(&self, other: TextRange) -> bool {
		self.start <= other.start && other.end <= self.end
	}

	/// Returns true if the two ranges share at least one character.
	#[inline]
	pub const fn intersects(&self, other: TextRange) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Smallest range covering both.
	#[inline]
	pub fn cover(&self, other: TextRange) -> TextRange {
		TextRange::new(self.start.min(other.start), self.end.max(other.end))
	}

	/// Moves both ends by a signed delta.
	#[inline]
	pub fn shifted(&self, delta: isize) -> TextRange {
		TextRange::new(shift(self.start, delta), shift(self.end, delta))
	}

	/// Moves only the end by a signed delta.
	#[inline]
	pub fn resized(&self, delta: isize) -> TextRange {
		TextRange::new(self.start, shift(self.end, delta))
	}

	/// Converts to a standard range for rope slicing.
	#[inline]
	pub const fn as_range(&self) -> StdRange<CharIdx> {
		self.start..self.end
	}
}

#[inline]
fn shift(offset: CharIdx, delta: isize) -> CharIdx {
	offset.saturating_add_signed(delta)
}

impl fmt::Debug for TextRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}

impl From<StdRange<CharIdx>> for TextRange {
	fn from(range: StdRange<CharIdx>) -> Self {
		TextRange::new(range.start, range.end)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_half_open_containment() {
		let range = TextRange::new(2, 5);
		assert!(!range.contains(1));
		assert!(range.contains(2));
		assert!(range.contains(4));
		assert!(!range.contains(5));
		assert!(range.contains_inclusive(5));
	}

	#[test]
	fn test_empty_range_contains_nothing() {
		let range = TextRange::empty(3);
		assert!(range.is_empty());
		assert!(!range.contains(3));
		assert!(range.contains_inclusive(3));
	}

	#[test]
	fn test_shift_and_resize() {
		let range = TextRange::new(4, 8);
		assert_eq!(range.shifted(3), TextRange::new(7, 11));
		assert_eq!(range.shifted(-4), TextRange::new(0, 4));
		assert_eq!(range.resized(-2), TextRange::new(4, 6));
	}

	#[test]
	fn test_intersects_is_exclusive_at_boundaries() {
		let a = TextRange::new(0, 3);
		assert!(!a.intersects(TextRange::new(3, 6)));
		assert!(a.intersects(TextRange::new(2, 6)));
		assert_eq!(a.cover(TextRange::new(5, 6)), TextRange::new(0, 6));
	}
}
