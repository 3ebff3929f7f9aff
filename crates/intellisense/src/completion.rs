//! Completion candidates.
//!
//! Each [`CompletionProvider`] contributes raw candidates tagged with their
//! source; the registry merges them and [`rank`](crate::filter::rank)s the
//! result against the typed prefix.

use std::sync::Arc;

use rsense_primitives::BoxFutureSend;
use tokio_util::sync::CancellationToken;

use crate::arguments::WrittenArguments;
use crate::context::IntellisenseContext;
use crate::index::FunctionIndex;
use crate::signature_help::signatures_for;
use crate::symbols::{SymbolKind, callee_name, visible_symbols};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
	Keyword,
	Function,
	Variable,
	/// `name = ` for a parameter of the enclosing call.
	Argument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
	pub label: String,
	pub kind: CompletionKind,
	pub insert_text: String,
	pub detail: Option<String>,
}

impl CompletionItem {
	pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
		let label = label.into();
		Self {
			insert_text: label.clone(),
			label,
			kind,
			detail: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionList {
	pub items: Vec<CompletionItem>,
	/// More items matched than were returned.
	pub is_incomplete: bool,
}

/// Where a candidate came from; decides which duplicate survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
	Keyword,
	Index,
	Document,
	ArgumentName,
}

impl CandidateSource {
	pub const fn priority(self) -> u8 {
		match self {
			Self::Keyword => 0,
			Self::Index => 1,
			Self::Document => 2,
			Self::ArgumentName => 3,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
	pub item: CompletionItem,
	pub source: CandidateSource,
}

impl Candidate {
	pub fn new(item: CompletionItem, source: CandidateSource) -> Self {
		Self { item, source }
	}
}

/// Contributes completion candidates for a query.
pub trait CompletionProvider: Send + Sync {
	fn candidates<'a>(
		&'a self,
		ctx: &'a IntellisenseContext,
		cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Vec<Candidate>>;
}

/// Reserved words and constants.
pub const KEYWORDS: &[&str] = &[
	"if",
	"else",
	"repeat",
	"while",
	"function",
	"for",
	"in",
	"next",
	"break",
	"TRUE",
	"FALSE",
	"NULL",
	"Inf",
	"NaN",
	"NA",
	"NA_integer_",
	"NA_real_",
	"NA_character_",
	"NA_complex_",
];

#[derive(Debug, Default)]
pub struct KeywordCompletions;

impl CompletionProvider for KeywordCompletions {
	fn candidates<'a>(
		&'a self,
		_ctx: &'a IntellisenseContext,
		_cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Vec<Candidate>> {
		Box::pin(async {
			KEYWORDS
				.iter()
				.map(|&kw| Candidate::new(CompletionItem::new(kw, CompletionKind::Keyword), CandidateSource::Keyword))
				.collect()
		})
	}
}

/// Symbols defined in the document.
#[derive(Debug, Default)]
pub struct DocumentCompletions;

impl CompletionProvider for DocumentCompletions {
	fn candidates<'a>(
		&'a self,
		ctx: &'a IntellisenseContext,
		_cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Vec<Candidate>> {
		Box::pin(async move {
			visible_symbols(ctx.tree(), ctx.position())
				.into_iter()
				.map(|symbol| {
					let kind = match symbol.kind {
						SymbolKind::Function => CompletionKind::Function,
						SymbolKind::Variable | SymbolKind::Parameter => CompletionKind::Variable,
					};
					Candidate::new(CompletionItem::new(symbol.name, kind), CandidateSource::Document)
				})
				.collect()
		})
	}
}

/// Function names known to the index.
pub struct IndexCompletions {
	index: Arc<dyn FunctionIndex>,
}

impl IndexCompletions {
	pub fn new(index: Arc<dyn FunctionIndex>) -> Self {
		Self { index }
	}
}

impl CompletionProvider for IndexCompletions {
	fn candidates<'a>(
		&'a self,
		_ctx: &'a IntellisenseContext,
		_cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Vec<Candidate>> {
		Box::pin(async move {
			self.index
				.names()
				.await
				.into_iter()
				.map(|name| {
					Candidate::new(
						CompletionItem::new(name.as_ref(), CompletionKind::Function),
						CandidateSource::Index,
					)
				})
				.collect()
		})
	}
}

/// `name = ` items for the parameters of the call around the position that
/// are not yet supplied by name.
pub struct ArgumentNameCompletions {
	index: Arc<dyn FunctionIndex>,
}

impl ArgumentNameCompletions {
	pub fn new(index: Arc<dyn FunctionIndex>) -> Self {
		Self { index }
	}
}

impl CompletionProvider for ArgumentNameCompletions {
	fn candidates<'a>(
		&'a self,
		ctx: &'a IntellisenseContext,
		cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Vec<Candidate>> {
		Box::pin(async move {
			let position = ctx.position();
			let Some(call) = ctx.tree().call_at(position) else {
				return Vec::new();
			};
			let (Some(name), Some(list)) = (call.callee().and_then(callee_name), call.arguments()) else {
				return Vec::new();
			};
			let written = WrittenArguments::from_list(list, position);
			if written.caret_name().is_some() {
				return Vec::new();
			}
			let supplied: Vec<String> = written.named().map(str::to_string).collect();
			let call_start = call.range().start();

			let signatures = signatures_for(self.index.as_ref(), ctx.tree(), &name, call_start).await;
			if cancel.is_cancelled() {
				return Vec::new();
			}
			let Some(signature) = signatures.first() else {
				return Vec::new();
			};
			signature
				.parameters
				.iter()
				.filter(|formal| !formal.is_sink() && !supplied.contains(&formal.name))
				.map(|formal| {
					let item = CompletionItem {
						label: format!("{} =", formal.name),
						kind: CompletionKind::Argument,
						insert_text: format!("{} = ", formal.name),
						detail: formal.default.clone(),
					};
					Candidate::new(item, CandidateSource::ArgumentName)
				})
				.collect()
		})
	}
}
