use rsense_intellisense::DocumentId;
use rsense_primitives::BufferError;
use rsense_syntax::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	#[error(transparent)]
	Buffer(#[from] BufferError),
	/// Fatal parse failure; the session stays faulted.
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error("document session has been disposed")]
	Disposed,
	#[error("no open document {0}")]
	UnknownDocument(DocumentId),
	#[error("document {0} is already open")]
	AlreadyOpen(DocumentId),
}

pub type Result<T> = std::result::Result<T, SessionError>;
