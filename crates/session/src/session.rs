//! One open document: its buffer, current tree and query dispatch.

use std::sync::Arc;

use parking_lot::RwLock;
use rsense_config::Config;
use rsense_intellisense::{
	CompletionList, DocumentId, FunctionIndex, Hover, IntellisenseContext, ProviderRegistry, SignatureHelp,
};
use rsense_primitives::{BufferError, CharIdx, LineCol, OffsetEncoding, Snapshot, TextBuffer, TextEdit, TextRange};
use rsense_syntax::{ParseError, SyntaxTree, TreeManager, UpdateMetrics, UpdateOutcome, parse};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Result, SessionError};

/// Shared collaborators handed to every session.
#[derive(Debug, Clone)]
pub struct SessionServices {
	pub registry: Arc<ProviderRegistry>,
	/// Splice local edits instead of reparsing.
	pub incremental: bool,
}

impl SessionServices {
	pub fn new(index: Arc<dyn FunctionIndex>, config: &Config) -> Self {
		Self {
			registry: Arc::new(ProviderRegistry::standard(index, config.completion.clone())),
			incremental: config.syntax.incremental,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
	Created,
	Ready,
	/// An edit batch holds the write lock.
	Editing,
	Disposed,
	/// A parse failed fatally; every operation reports the error.
	Faulted(ParseError),
}

/// Where a change applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeRange {
	/// Character offsets.
	Offsets { start: CharIdx, end: CharIdx },
	/// Line/column positions with columns in `encoding` units.
	Positions {
		start: LineCol,
		end: LineCol,
		encoding: OffsetEncoding,
	},
}

/// One change of a batch, resolved against the text left by the previous
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
	/// `None` replaces the whole document.
	pub range: Option<ChangeRange>,
	pub text: String,
}

impl TextChange {
	pub fn full(text: impl Into<String>) -> Self {
		Self {
			range: None,
			text: text.into(),
		}
	}

	pub fn offsets(start: CharIdx, end: CharIdx, text: impl Into<String>) -> Self {
		Self {
			range: Some(ChangeRange::Offsets { start, end }),
			text: text.into(),
		}
	}

	/// Edit this change makes to `snapshot`.
	fn to_edit(&self, snapshot: &Snapshot) -> Result<TextEdit> {
		let (start, end) = match self.range {
			None => (0, snapshot.len()),
			Some(ChangeRange::Offsets { start, end }) => (start, end),
			Some(ChangeRange::Positions { start, end, encoding }) => {
				(snapshot.offset_at(start, encoding)?, snapshot.offset_at(end, encoding)?)
			}
		};
		if start > end || end > snapshot.len() {
			return Err(BufferError::OutOfRange {
				start,
				end,
				len: snapshot.len(),
			}
			.into());
		}
		let range = TextRange::new(start, end);
		Ok(match (range.is_empty(), self.text.is_empty()) {
			(true, _) => TextEdit::insert(start, self.text.as_str()),
			(false, true) => TextEdit::delete(range),
			(false, false) => TextEdit::replace(range, self.text.as_str()),
		})
	}
}

struct Live {
	buffer: TextBuffer,
	tree: Arc<SyntaxTree>,
	trees: TreeManager,
}

struct Inner {
	state: SessionState,
	live: Option<Live>,
}

/// Owns exactly one buffer and the tree for its current version.
///
/// Edit batches run under the write lock. Queries hold the read lock only
/// long enough to capture the current tree, then run without any lock, so
/// a query always sees one consistent version.
pub struct DocumentSession {
	id: DocumentId,
	services: SessionServices,
	inner: RwLock<Inner>,
}

impl std::fmt::Debug for DocumentSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentSession")
			.field("id", &self.id)
			.field("state", &self.state())
			.finish()
	}
}

impl DocumentSession {
	/// Parses `text` and returns a ready session.
	pub fn open(id: DocumentId, text: &str, services: SessionServices) -> Result<Self> {
		let session = Self {
			id,
			inner: RwLock::new(Inner {
				state: SessionState::Created,
				live: None,
			}),
			services,
		};

		let buffer = TextBuffer::new(text);
		let tree = parse(&buffer.snapshot())?;
		{
			let mut inner = session.inner.write();
			inner.live = Some(Live {
				buffer,
				tree: Arc::new(tree),
				trees: TreeManager::new(session.services.incremental),
			});
			inner.state = SessionState::Ready;
		}
		debug!(document = %session.id, len = text.chars().count(), "session.open");
		Ok(session)
	}

	pub fn id(&self) -> &DocumentId {
		&self.id
	}

	pub fn services(&self) -> &SessionServices {
		&self.services
	}

	pub fn state(&self) -> SessionState {
		self.inner.read().state.clone()
	}

	pub fn version(&self) -> Result<u64> {
		self.read(|live| live.buffer.version())
	}

	pub fn text(&self) -> Result<String> {
		self.read(|live| live.buffer.text())
	}

	pub fn snapshot(&self) -> Result<Snapshot> {
		self.read(|live| live.tree.snapshot().clone())
	}

	pub fn tree(&self) -> Result<Arc<SyntaxTree>> {
		self.read(|live| Arc::clone(&live.tree))
	}

	pub fn update_metrics(&self) -> Result<UpdateMetrics> {
		self.read(|live| live.trees.metrics().clone())
	}

	fn read<T>(&self, f: impl FnOnce(&Live) -> T) -> Result<T> {
		let inner = self.inner.read();
		match (&inner.state, &inner.live) {
			(SessionState::Faulted(error), _) => Err(SessionError::Parse(error.clone())),
			(SessionState::Disposed, _) | (_, None) => Err(SessionError::Disposed),
			(_, Some(live)) => Ok(f(live)),
		}
	}

	/// Applies one batch of changes made against `expected_version`.
	///
	/// The batch is all or nothing: if any change is out of range the
	/// document is left as it was. Returns the new version.
	pub fn apply_changes(&self, expected_version: u64, changes: &[TextChange]) -> Result<u64> {
		let mut inner = self.inner.write();
		match &inner.state {
			SessionState::Faulted(error) => return Err(SessionError::Parse(error.clone())),
			SessionState::Disposed => return Err(SessionError::Disposed),
			_ => {}
		}
		let Some(live) = inner.live.as_mut() else {
			return Err(SessionError::Disposed);
		};
		let actual = live.buffer.version();
		if actual != expected_version {
			return Err(BufferError::VersionMismatch {
				expected: expected_version,
				actual,
			}
			.into());
		}

		let checkpoint = (live.buffer.clone(), Arc::clone(&live.tree), live.trees.clone());
		inner.state = SessionState::Editing;
		let outcome = Self::apply_batch(&mut inner, changes);
		match outcome {
			Ok(outcomes) => {
				inner.state = SessionState::Ready;
				let version = inner.live.as_ref().map_or(actual, |live| live.buffer.version());
				debug!(
					document = %self.id,
					from = expected_version,
					to = version,
					changes = changes.len(),
					incremental = outcomes.iter().filter(|o| o.is_incremental()).count(),
					"session.apply"
				);
				Ok(version)
			}
			Err(SessionError::Parse(error)) => {
				warn!(document = %self.id, %error, "session.faulted");
				inner.state = SessionState::Faulted(error.clone());
				inner.live = None;
				Err(SessionError::Parse(error))
			}
			Err(error) => {
				if let Some(live) = inner.live.as_mut() {
					(live.buffer, live.tree, live.trees) = checkpoint;
				}
				inner.state = SessionState::Ready;
				Err(error)
			}
		}
	}

	fn apply_batch(inner: &mut Inner, changes: &[TextChange]) -> Result<Vec<UpdateOutcome>> {
		let Some(live) = inner.live.as_mut() else {
			return Err(SessionError::Disposed);
		};
		let mut outcomes = Vec::with_capacity(changes.len());
		for change in changes {
			let edit = change.to_edit(live.tree.snapshot())?;
			let applied = live.buffer.apply(edit)?;
			let snapshot = live.buffer.snapshot();
			let result = live.trees.update(&live.tree, &applied, &snapshot)?;
			outcomes.push(result.outcome);
			live.tree = Arc::new(result.tree);
		}
		Ok(outcomes)
	}

	/// Captures the current tree for a query at `position`.
	pub fn context(&self, position: CharIdx) -> Result<IntellisenseContext> {
		Ok(self.read(|live| IntellisenseContext::new(self.id.clone(), Arc::clone(&live.tree), position))??)
	}

	/// Like [`context`](Self::context), converting a protocol position in the
	/// same critical section.
	pub fn context_at(&self, position: LineCol, encoding: OffsetEncoding) -> Result<IntellisenseContext> {
		self.read(|live| -> Result<IntellisenseContext> {
			let offset = live.tree.snapshot().offset_at(position, encoding)?;
			Ok(IntellisenseContext::new(self.id.clone(), Arc::clone(&live.tree), offset)?)
		})?
	}

	pub async fn completions(&self, position: CharIdx, cancel: &CancellationToken) -> Result<Option<CompletionList>> {
		let ctx = self.context(position)?;
		Ok(self.services.registry.completions(&ctx, cancel).await)
	}

	pub async fn signature_help(&self, position: CharIdx, cancel: &CancellationToken) -> Result<Option<SignatureHelp>> {
		let ctx = self.context(position)?;
		Ok(self.services.registry.signature_help(&ctx, cancel).await)
	}

	pub async fn hover(&self, position: CharIdx, cancel: &CancellationToken) -> Result<Option<Hover>> {
		let ctx = self.context(position)?;
		Ok(self.services.registry.hover(&ctx, cancel).await)
	}

	/// Releases the buffer and tree. Queries already running keep their
	/// captured tree.
	pub fn dispose(&self) {
		let mut inner = self.inner.write();
		inner.live = None;
		inner.state = SessionState::Disposed;
		debug!(document = %self.id, "session.dispose");
	}
}
