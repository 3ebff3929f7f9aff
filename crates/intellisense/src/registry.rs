//! Explicit provider registry and cancellable dispatch.

use std::future::Future;
use std::sync::Arc;

use rsense_config::CompletionConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::completion::{
	ArgumentNameCompletions, CompletionList, CompletionProvider, DocumentCompletions, IndexCompletions,
	KeywordCompletions,
};
use crate::context::IntellisenseContext;
use crate::filter::rank;
use crate::hover::{Hover, HoverProvider, SignatureHover};
use crate::index::FunctionIndex;
use crate::signature_help::{CallSignatures, SignatureHelp, SignatureProvider};

/// Owns the providers and dispatches queries to them.
///
/// A cancelled query yields `None`, never a partial result.
#[derive(Clone)]
pub struct ProviderRegistry {
	completion: Vec<Arc<dyn CompletionProvider>>,
	signature: Option<Arc<dyn SignatureProvider>>,
	hover: Option<Arc<dyn HoverProvider>>,
	config: CompletionConfig,
}

impl std::fmt::Debug for ProviderRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProviderRegistry")
			.field("completion", &self.completion.len())
			.field("signature", &self.signature.is_some())
			.field("hover", &self.hover.is_some())
			.field("config", &self.config)
			.finish()
	}
}

impl ProviderRegistry {
	/// Empty registry.
	pub fn new(config: CompletionConfig) -> Self {
		Self {
			completion: Vec::new(),
			signature: None,
			hover: None,
			config,
		}
	}

	/// Registry with the built-in providers backed by `index`.
	pub fn standard(index: Arc<dyn FunctionIndex>, config: CompletionConfig) -> Self {
		let mut registry = Self::new(config);
		if registry.config.keywords {
			registry = registry.with_completion(Arc::new(KeywordCompletions));
		}
		registry = registry
			.with_completion(Arc::new(DocumentCompletions))
			.with_completion(Arc::new(IndexCompletions::new(Arc::clone(&index))));
		if registry.config.argument_names {
			registry = registry.with_completion(Arc::new(ArgumentNameCompletions::new(Arc::clone(&index))));
		}
		registry
			.with_signature(Arc::new(CallSignatures::new(Arc::clone(&index))))
			.with_hover(Arc::new(SignatureHover::new(index)))
	}

	pub fn with_completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
		self.completion.push(provider);
		self
	}

	pub fn with_signature(mut self, provider: Arc<dyn SignatureProvider>) -> Self {
		self.signature = Some(provider);
		self
	}

	pub fn with_hover(mut self, provider: Arc<dyn HoverProvider>) -> Self {
		self.hover = Some(provider);
		self
	}

	pub fn config(&self) -> &CompletionConfig {
		&self.config
	}

	/// Ranked completions at the context position.
	///
	/// Inside strings and comments, and after `$` or `@`, the list is empty.
	pub async fn completions(&self, ctx: &IntellisenseContext, cancel: &CancellationToken) -> Option<CompletionList> {
		if ctx.is_vetoed() || ctx.is_member_access() {
			debug!(document = %ctx.document(), position = ctx.position(), "completion.vetoed");
			return Some(CompletionList::default());
		}

		let (prefix, _) = ctx.identifier_prefix();
		let mut candidates = Vec::new();
		for provider in &self.completion {
			candidates.extend(cancellable(cancel, provider.candidates(ctx, cancel)).await?);
		}
		let list = rank(candidates, &prefix, self.config.fuzzy, self.config.max_items);
		debug!(
			document = %ctx.document(),
			version = ctx.version(),
			prefix = %prefix,
			items = list.items.len(),
			incomplete = list.is_incomplete,
			"completion.done"
		);
		Some(list)
	}

	pub async fn signature_help(&self, ctx: &IntellisenseContext, cancel: &CancellationToken) -> Option<SignatureHelp> {
		let provider = self.signature.as_ref()?;
		let help = cancellable(cancel, provider.signature_help(ctx, cancel)).await??;
		debug!(
			document = %ctx.document(),
			version = ctx.version(),
			signatures = help.signatures.len(),
			active_parameter = ?help.active_parameter,
			"signature.done"
		);
		Some(help)
	}

	pub async fn hover(&self, ctx: &IntellisenseContext, cancel: &CancellationToken) -> Option<Hover> {
		let provider = self.hover.as_ref()?;
		cancellable(cancel, provider.hover(ctx, cancel)).await?
	}
}

/// Runs `fut` unless `cancel` fires first; a result that arrives after
/// cancellation is dropped.
async fn cancellable<T>(cancel: &CancellationToken, fut: impl Future<Output = T>) -> Option<T> {
	let result = tokio::select! {
		_ = cancel.cancelled() => None,
		result = fut => Some(result),
	};
	if cancel.is_cancelled() {
		debug!("query.cancelled");
		return None;
	}
	result
}
