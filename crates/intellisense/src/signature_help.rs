//! Signature help for the call around the position.

use std::sync::Arc;

use rsense_primitives::{BoxFutureSend, CharIdx};
use rsense_syntax::SyntaxTree;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::arguments::WrittenArguments;
use crate::context::IntellisenseContext;
use crate::index::FunctionIndex;
use crate::signature::FunctionSignature;
use crate::symbols::{callee_name, local_signature};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
	pub label: String,
	/// `[start, end)` of the parameter within the signature label, in chars.
	pub range: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
	pub label: String,
	pub parameters: Vec<ParameterInfo>,
	pub documentation: Option<String>,
	/// Parameter the caret argument binds to.
	pub current_parameter: Option<usize>,
}

impl SignatureInfo {
	pub fn new(signature: &FunctionSignature, current_parameter: Option<usize>) -> Self {
		let label = signature.label();
		let parameters = signature
			.parameters
			.iter()
			.zip(label.parameters)
			.map(|(formal, range)| ParameterInfo {
				label: formal.label(),
				range,
			})
			.collect();
		Self {
			label: label.text,
			parameters,
			documentation: signature.documentation.clone(),
			current_parameter,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelp {
	pub signatures: Vec<SignatureInfo>,
	pub active_signature: usize,
	pub active_parameter: Option<usize>,
}

impl SignatureHelp {
	pub fn active(&self) -> Option<&SignatureInfo> {
		self.signatures.get(self.active_signature)
	}
}

/// Resolves signature help for a query.
pub trait SignatureProvider: Send + Sync {
	fn signature_help<'a>(
		&'a self,
		ctx: &'a IntellisenseContext,
		cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Option<SignatureHelp>>;
}

/// Signatures callable as `name` at `position`.
///
/// A function defined in the document shadows the index entirely.
pub(crate) async fn signatures_for(
	index: &dyn FunctionIndex,
	tree: &SyntaxTree,
	name: &str,
	position: CharIdx,
) -> Vec<Arc<FunctionSignature>> {
	if let Some(local) = local_signature(tree, name, position) {
		return vec![Arc::new(local)];
	}
	index.lookup(name).await
}

/// Signature help from document definitions and a [`FunctionIndex`].
pub struct CallSignatures {
	index: Arc<dyn FunctionIndex>,
}

impl CallSignatures {
	pub fn new(index: Arc<dyn FunctionIndex>) -> Self {
		Self { index }
	}
}

impl SignatureProvider for CallSignatures {
	fn signature_help<'a>(
		&'a self,
		ctx: &'a IntellisenseContext,
		cancel: &'a CancellationToken,
	) -> BoxFutureSend<'a, Option<SignatureHelp>> {
		Box::pin(async move {
			if ctx.is_vetoed() {
				return None;
			}
			let position = ctx.position();
			let call = ctx.tree().call_at(position)?;
			let name = call.callee().and_then(callee_name)?;
			let written = WrittenArguments::from_list(call.arguments()?, position);
			let call_start = call.range().start();

			let signatures = signatures_for(self.index.as_ref(), ctx.tree(), &name, call_start).await;
			if signatures.is_empty() || cancel.is_cancelled() {
				trace!(name, "signature.unresolved");
				return None;
			}

			let signatures: Vec<SignatureInfo> = signatures
				.iter()
				.map(|signature| SignatureInfo::new(signature, written.current_parameter(&signature.parameters)))
				.collect();
			let active_signature = signatures
				.iter()
				.position(|s| s.current_parameter.is_some())
				.unwrap_or(0);
			let active_parameter = signatures[active_signature].current_parameter;
			Some(SignatureHelp {
				signatures,
				active_signature,
				active_parameter,
			})
		})
	}
}

#[cfg(test)]
mod tests;
