use std::fmt;

/// Zero-based line/column position.
///
/// Columns count characters within the line, excluding the line terminator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
	/// Zero-based line index.
	pub line: usize,
	/// Zero-based column within the line.
	pub column: usize,
}

impl LineCol {
	/// Creates a new line/column position.
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl fmt::Debug for LineCol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Unit used to count columns in protocol positions.
///
/// Buffers always count characters; protocol clients negotiate one of these
/// encodings and columns are converted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OffsetEncoding {
	/// UTF-8 code units (bytes).
	Utf8,
	/// UTF-16 code units, the LSP default.
	#[default]
	Utf16,
	/// Unicode scalar values, identical to buffer columns.
	Utf32,
}

impl OffsetEncoding {
	/// Parses the LSP `positionEncoding` names (`utf-8`, `utf-16`, `utf-32`).
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"utf-8" | "utf8" => Some(Self::Utf8),
			"utf-16" | "utf16" => Some(Self::Utf16),
			"utf-32" | "utf32" => Some(Self::Utf32),
			_ => None,
		}
	}

	/// Returns the LSP name of this encoding.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Utf8 => "utf-8",
			Self::Utf16 => "utf-16",
			Self::Utf32 => "utf-32",
		}
	}
}
