//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A known key holds a value of the wrong type or out of range.
	#[error("invalid value for '{key}': {reason}")]
	InvalidValue {
		/// Dotted key, e.g. `completion.max-items`.
		key: String,
		/// What was expected.
		reason: String,
	},
}

/// Non-fatal problems found while parsing; the offending entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
	/// A top-level section nobody reads.
	#[error("unknown section '{0}' will be ignored")]
	UnknownSection(String),
	/// A key inside a known section nobody reads.
	#[error("unknown key '{key}' in '{section}' will be ignored")]
	UnknownKey {
		/// Section the key appeared in.
		section: String,
		/// The unknown key.
		key: String,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
