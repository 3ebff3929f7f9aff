//! Open documents keyed by id, answering protocol-shaped queries.

use std::sync::Arc;

use lsp_types as lsp;
use parking_lot::RwLock;
use rsense_config::Config;
use rsense_intellisense::{DocumentId, FunctionIndex};
use rsense_primitives::OffsetEncoding;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::protocol;
use crate::session::{DocumentSession, SessionServices, TextChange};

/// All open sessions, sharing one index, registry and configuration.
#[derive(Debug)]
pub struct DocumentManager {
	documents: RwLock<FxHashMap<DocumentId, Arc<DocumentSession>>>,
	services: SessionServices,
	encoding: OffsetEncoding,
}

impl DocumentManager {
	pub fn new(index: Arc<dyn FunctionIndex>, config: &Config) -> Self {
		Self {
			documents: RwLock::new(FxHashMap::default()),
			services: SessionServices::new(index, config),
			encoding: config.protocol.position_encoding,
		}
	}

	/// Column encoding used for every protocol position.
	pub fn encoding(&self) -> OffsetEncoding {
		self.encoding
	}

	pub fn open(&self, id: DocumentId, text: &str) -> Result<Arc<DocumentSession>> {
		if self.documents.read().contains_key(&id) {
			return Err(SessionError::AlreadyOpen(id));
		}
		// Parse outside the map lock.
		let session = Arc::new(DocumentSession::open(id.clone(), text, self.services.clone())?);
		let mut documents = self.documents.write();
		if documents.contains_key(&id) {
			return Err(SessionError::AlreadyOpen(id));
		}
		documents.insert(id, Arc::clone(&session));
		Ok(session)
	}

	/// Disposes and forgets a document.
	pub fn close(&self, id: &DocumentId) -> Result<()> {
		let session = self
			.documents
			.write()
			.remove(id)
			.ok_or_else(|| SessionError::UnknownDocument(id.clone()))?;
		session.dispose();
		debug!(document = %id, "manager.close");
		Ok(())
	}

	pub fn session(&self, id: &DocumentId) -> Result<Arc<DocumentSession>> {
		self.documents
			.read()
			.get(id)
			.cloned()
			.ok_or_else(|| SessionError::UnknownDocument(id.clone()))
	}

	pub fn document_ids(&self) -> Vec<DocumentId> {
		let mut ids: Vec<_> = self.documents.read().keys().cloned().collect();
		ids.sort();
		ids
	}

	/// Applies protocol change events made against `expected_version`.
	pub fn apply_changes(
		&self,
		id: &DocumentId,
		expected_version: u64,
		events: Vec<lsp::TextDocumentContentChangeEvent>,
	) -> Result<u64> {
		let changes: Vec<TextChange> = events
			.into_iter()
			.map(|event| protocol::to_text_change(event, self.encoding))
			.collect();
		self.session(id)?.apply_changes(expected_version, &changes)
	}

	pub async fn completions(
		&self,
		id: &DocumentId,
		position: lsp::Position,
		cancel: &CancellationToken,
	) -> Result<Option<lsp::CompletionList>> {
		let session = self.session(id)?;
		let ctx = session.context_at(protocol::to_line_col(position), self.encoding)?;
		let list = session.services().registry.completions(&ctx, cancel).await;
		Ok(list.map(protocol::to_lsp_completion_list))
	}

	pub async fn signature_help(
		&self,
		id: &DocumentId,
		position: lsp::Position,
		cancel: &CancellationToken,
	) -> Result<Option<lsp::SignatureHelp>> {
		let session = self.session(id)?;
		let ctx = session.context_at(protocol::to_line_col(position), self.encoding)?;
		let help = session.services().registry.signature_help(&ctx, cancel).await;
		Ok(help.map(|help| protocol::to_lsp_signature_help(help, self.encoding)))
	}

	pub async fn hover(
		&self,
		id: &DocumentId,
		position: lsp::Position,
		cancel: &CancellationToken,
	) -> Result<Option<lsp::Hover>> {
		let session = self.session(id)?;
		let ctx = session.context_at(protocol::to_line_col(position), self.encoding)?;
		let Some(hover) = session.services().registry.hover(&ctx, cancel).await else {
			return Ok(None);
		};
		protocol::to_lsp_hover(hover, ctx.snapshot(), self.encoding).map(Some)
	}
}
