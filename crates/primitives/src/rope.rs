//! Rope utilities and extensions.

use ropey::RopeSlice;

use crate::position::{LineCol, OffsetEncoding};
use crate::range::{CharIdx, CharLen};

/// Returns true for characters ropey treats as line breaks.
#[inline]
pub fn is_line_break(ch: char) -> bool {
	matches!(ch, '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Returns the number of characters in a line slice, excluding its terminator.
pub fn line_content_len(line: RopeSlice) -> CharLen {
	let len = line.len_chars();
	if len == 0 {
		return 0;
	}
	let last = line.char(len - 1);
	if last == '\n' && len >= 2 && line.char(len - 2) == '\r' {
		len - 2
	} else if is_line_break(last) {
		len - 1
	} else {
		len
	}
}

/// Converts a line/column position to a character offset.
///
/// Returns `None` when the line does not exist or the column lies past the
/// end of the line's content.
pub fn line_col_to_char(text: RopeSlice, pos: LineCol, encoding: OffsetEncoding) -> Option<CharIdx> {
	if pos.line >= text.len_lines() {
		return None;
	}
	let line_start = text.line_to_char(pos.line);
	let line = text.line(pos.line);
	let content = line.slice(..line_content_len(line));

	let column = match encoding {
		OffsetEncoding::Utf32 => (pos.column <= content.len_chars()).then_some(pos.column)?,
		OffsetEncoding::Utf16 => {
			if pos.column > content.len_utf16_cu() {
				return None;
			}
			content.utf16_cu_to_char(pos.column)
		}
		OffsetEncoding::Utf8 => {
			if pos.column > content.len_bytes() {
				return None;
			}
			content.byte_to_char(pos.column)
		}
	};

	Some(line_start + column)
}

/// Converts a character offset to a line/column position.
///
/// Offsets equal to the text length are valid and address the end of the
/// last line.
pub fn char_to_line_col(text: RopeSlice, offset: CharIdx, encoding: OffsetEncoding) -> Option<LineCol> {
	if offset > text.len_chars() {
		return None;
	}
	let line = text.char_to_line(offset);
	let line_start = text.line_to_char(line);
	let chars = offset - line_start;
	let column = match encoding {
		OffsetEncoding::Utf32 => chars,
		OffsetEncoding::Utf16 => text.line(line).char_to_utf16_cu(chars),
		OffsetEncoding::Utf8 => text.line(line).char_to_byte(chars),
	};
	Some(LineCol::new(line, column))
}
