use std::sync::Arc;

use rsense_primitives::{BoxFutureSend, TextRange};
use tokio_util::sync::CancellationToken;

use crate::context::IntellisenseContext;
use crate::index::FunctionIndex;
use crate::signature_help::signatures_for;
use crate::symbols::symbol_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
	/// Markdown.
	pub contents: String,
	/// Identifier the hover describes.
	pub range: TextRange,
}

pub trait HoverProvider: Send + Sync {
	fn hover<'a>(&'a self, ctx: &'a IntellisenseContext, cancel: &'a CancellationToken) -> BoxFutureSend<'a, Option<Hover>>;
}

/// Hover showing the signatures known for the identifier under the caret.
pub struct SignatureHover {
	index: Arc<dyn FunctionIndex>,
}

impl SignatureHover {
	pub fn new(index: Arc<dyn FunctionIndex>) -> Self {
		Self { index }
	}
}

impl HoverProvider for SignatureHover {
	fn hover<'a>(&'a self, ctx: &'a IntellisenseContext, cancel: &'a CancellationToken) -> BoxFutureSend<'a, Option<Hover>> {
		Box::pin(async move {
			if ctx.is_vetoed() {
				return None;
			}
			let identifier = ctx.identifier_at()?;
			let range = identifier.range();
			let name = symbol_name(identifier)?;

			let signatures = signatures_for(self.index.as_ref(), ctx.tree(), &name, range.start()).await;
			if signatures.is_empty() || cancel.is_cancelled() {
				return None;
			}

			let labels: Vec<String> = signatures.iter().map(|s| s.label().text).collect();
			let mut contents = format!("```r\n{}\n```", labels.join("\n"));
			if let Some(documentation) = signatures.iter().find_map(|s| s.documentation.as_deref()) {
				contents.push_str("\n\n");
				contents.push_str(documentation);
			}
			Some(Hover { contents, range })
		})
	}
}
