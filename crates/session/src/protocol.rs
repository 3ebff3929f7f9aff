//! Conversion between engine results and `lsp-types` payloads.
//!
//! The engine counts characters; protocol columns are counted in the
//! negotiated [`OffsetEncoding`] and converted here.

use lsp_types as lsp;
use rsense_intellisense::{CompletionItem, CompletionKind, CompletionList, Hover, SignatureHelp};
use rsense_primitives::{CharIdx, LineCol, OffsetEncoding, Snapshot, TextRange};

use crate::error::Result;
use crate::session::{ChangeRange, TextChange};

pub fn to_line_col(position: lsp::Position) -> LineCol {
	LineCol::new(position.line as usize, position.character as usize)
}

pub fn to_lsp_position(snapshot: &Snapshot, offset: CharIdx, encoding: OffsetEncoding) -> Result<lsp::Position> {
	let pos = snapshot.line_col_at(offset, encoding)?;
	Ok(lsp::Position::new(pos.line as u32, pos.column as u32))
}

pub fn to_lsp_range(snapshot: &Snapshot, range: TextRange, encoding: OffsetEncoding) -> Result<lsp::Range> {
	Ok(lsp::Range::new(
		to_lsp_position(snapshot, range.start(), encoding)?,
		to_lsp_position(snapshot, range.end(), encoding)?,
	))
}

pub fn position_encoding_kind(encoding: OffsetEncoding) -> lsp::PositionEncodingKind {
	match encoding {
		OffsetEncoding::Utf8 => lsp::PositionEncodingKind::UTF8,
		OffsetEncoding::Utf16 => lsp::PositionEncodingKind::UTF16,
		OffsetEncoding::Utf32 => lsp::PositionEncodingKind::UTF32,
	}
}

/// Change event as a [`TextChange`]; a missing range replaces the document.
pub fn to_text_change(event: lsp::TextDocumentContentChangeEvent, encoding: OffsetEncoding) -> TextChange {
	TextChange {
		range: event.range.map(|range| ChangeRange::Positions {
			start: to_line_col(range.start),
			end: to_line_col(range.end),
			encoding,
		}),
		text: event.text,
	}
}

fn completion_kind(kind: CompletionKind) -> lsp::CompletionItemKind {
	match kind {
		CompletionKind::Keyword => lsp::CompletionItemKind::KEYWORD,
		CompletionKind::Function => lsp::CompletionItemKind::FUNCTION,
		CompletionKind::Variable => lsp::CompletionItemKind::VARIABLE,
		CompletionKind::Argument => lsp::CompletionItemKind::FIELD,
	}
}

fn to_lsp_completion_item(item: CompletionItem) -> lsp::CompletionItem {
	lsp::CompletionItem {
		kind: Some(completion_kind(item.kind)),
		insert_text: Some(item.insert_text),
		detail: item.detail,
		label: item.label,
		..Default::default()
	}
}

pub fn to_lsp_completion_list(list: CompletionList) -> lsp::CompletionList {
	lsp::CompletionList {
		is_incomplete: list.is_incomplete,
		items: list.items.into_iter().map(to_lsp_completion_item).collect(),
	}
}

/// Width of the first `chars` characters of `text` in `encoding` units.
fn encoded_len(text: &str, chars: usize, encoding: OffsetEncoding) -> u32 {
	let width: usize = text
		.chars()
		.take(chars)
		.map(|ch| match encoding {
			OffsetEncoding::Utf8 => ch.len_utf8(),
			OffsetEncoding::Utf16 => ch.len_utf16(),
			OffsetEncoding::Utf32 => 1,
		})
		.sum();
	width as u32
}

fn markdown(value: String) -> lsp::MarkupContent {
	lsp::MarkupContent {
		kind: lsp::MarkupKind::Markdown,
		value,
	}
}

pub fn to_lsp_signature_help(help: SignatureHelp, encoding: OffsetEncoding) -> lsp::SignatureHelp {
	let signatures = help
		.signatures
		.into_iter()
		.map(|signature| {
			let parameters = signature
				.parameters
				.iter()
				.map(|parameter| lsp::ParameterInformation {
					label: lsp::ParameterLabel::LabelOffsets([
						encoded_len(&signature.label, parameter.range.0, encoding),
						encoded_len(&signature.label, parameter.range.1, encoding),
					]),
					documentation: None,
				})
				.collect();
			lsp::SignatureInformation {
				documentation: signature
					.documentation
					.map(|docs| lsp::Documentation::MarkupContent(markdown(docs))),
				parameters: Some(parameters),
				active_parameter: signature.current_parameter.map(|i| i as u32),
				label: signature.label,
			}
		})
		.collect();
	lsp::SignatureHelp {
		signatures,
		active_signature: Some(help.active_signature as u32),
		active_parameter: help.active_parameter.map(|i| i as u32),
	}
}

pub fn to_lsp_hover(hover: Hover, snapshot: &Snapshot, encoding: OffsetEncoding) -> Result<lsp::Hover> {
	Ok(lsp::Hover {
		contents: lsp::HoverContents::Markup(markdown(hover.contents)),
		range: Some(to_lsp_range(snapshot, hover.range, encoding)?),
	})
}
