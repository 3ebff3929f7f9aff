use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while seeding a [`SymbolIndex`](crate::SymbolIndex).
#[derive(Debug, Error)]
pub enum IndexError {
	#[error("invalid signature data: {0}")]
	Json(#[from] serde_json::Error),
	#[error("failed to read index {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
}

pub type Result<T> = std::result::Result<T, IndexError>;
