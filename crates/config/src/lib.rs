//! Configuration for rsense.
//!
//! Configuration is written in KDL (v2). Every key is optional and falls back
//! to a default:
//!
//! ```kdl
//! completion {
//!     max-items 200
//!     fuzzy #true
//!     keywords #true
//!     argument-names #true
//! }
//!
//! syntax {
//!     incremental #true
//! }
//!
//! protocol {
//!     position-encoding "utf-16"
//! }
//! ```
//!
//! Unknown sections and keys are collected in [`Config::warnings`] rather
//! than failing the parse. Known keys with bad values are errors.

pub mod error;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlNode, KdlValue};
pub use error::{ConfigError, ConfigWarning, Result};
use rsense_primitives::OffsetEncoding;

/// Completion ranking and filtering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
	/// Maximum number of items returned; longer lists are marked incomplete.
	pub max_items: usize,
	/// Accept subsequence matches after prefix matches.
	pub fuzzy: bool,
	/// Offer R keywords and constants.
	pub keywords: bool,
	/// Offer `name = ` items for the enclosing call's parameters.
	pub argument_names: bool,
}

impl Default for CompletionConfig {
	fn default() -> Self {
		Self {
			max_items: 200,
			fuzzy: true,
			keywords: true,
			argument_names: true,
		}
	}
}

/// Syntax tree maintenance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxConfig {
	/// Splice local edits into the previous tree instead of reparsing.
	pub incremental: bool,
}

impl Default for SyntaxConfig {
	fn default() -> Self {
		Self { incremental: true }
	}
}

/// Protocol boundary settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolConfig {
	/// Unit protocol columns are counted in.
	pub position_encoding: OffsetEncoding,
}

/// Parsed configuration from a KDL file.
#[derive(Debug, Clone, Default)]
pub struct Config {
	pub completion: CompletionConfig,
	pub syntax: SyntaxConfig,
	pub protocol: ProtocolConfig,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

impl Config {
	/// Parse a KDL string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let doc: KdlDocument = input.parse()?;
		let mut config = Config::default();

		for node in doc.nodes() {
			let section = node.name().value();
			let Some(children) = node.children() else {
				config.warnings.push(ConfigWarning::UnknownSection(section.to_string()));
				continue;
			};
			match section {
				"completion" => config.parse_completion(children)?,
				"syntax" => config.parse_syntax(children)?,
				"protocol" => config.parse_protocol(children)?,
				_ => config.warnings.push(ConfigWarning::UnknownSection(section.to_string())),
			}
		}

		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Loads `path` if given, else the default location if it exists, else
	/// the defaults.
	pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::load(path),
			None => match default_path().filter(|p| p.is_file()) {
				Some(path) => Self::load(path),
				None => Ok(Self::default()),
			},
		}
	}

	fn parse_completion(&mut self, doc: &KdlDocument) -> Result<()> {
		for node in doc.nodes() {
			match node.name().value() {
				"max-items" => {
					let value = integer(node, "completion.max-items")?;
					self.completion.max_items = usize::try_from(value)
						.ok()
						.filter(|&n| n > 0)
						.ok_or_else(|| invalid("completion.max-items", "expected a positive integer"))?;
				}
				"fuzzy" => self.completion.fuzzy = boolean(node, "completion.fuzzy")?,
				"keywords" => self.completion.keywords = boolean(node, "completion.keywords")?,
				"argument-names" => self.completion.argument_names = boolean(node, "completion.argument-names")?,
				key => self.unknown_key("completion", key),
			}
		}
		Ok(())
	}

	fn parse_syntax(&mut self, doc: &KdlDocument) -> Result<()> {
		for node in doc.nodes() {
			match node.name().value() {
				"incremental" => self.syntax.incremental = boolean(node, "syntax.incremental")?,
				key => self.unknown_key("syntax", key),
			}
		}
		Ok(())
	}

	fn parse_protocol(&mut self, doc: &KdlDocument) -> Result<()> {
		for node in doc.nodes() {
			match node.name().value() {
				"position-encoding" => {
					let name = value(node, "protocol.position-encoding")?
						.as_string()
						.ok_or_else(|| invalid("protocol.position-encoding", "expected a string"))?;
					self.protocol.position_encoding = OffsetEncoding::from_name(name)
						.ok_or_else(|| invalid("protocol.position-encoding", "expected utf-8, utf-16 or utf-32"))?;
				}
				key => self.unknown_key("protocol", key),
			}
		}
		Ok(())
	}

	fn unknown_key(&mut self, section: &str, key: &str) {
		self.warnings.push(ConfigWarning::UnknownKey {
			section: section.to_string(),
			key: key.to_string(),
		});
	}
}

/// `rsense/config.kdl` under `$XDG_CONFIG_HOME` when set, else under the
/// platform config directory.
pub fn default_path() -> Option<PathBuf> {
	path_under(std::env::var_os("XDG_CONFIG_HOME"))
}

fn path_under(xdg_config_home: Option<OsString>) -> Option<PathBuf> {
	let base = xdg_config_home
		.filter(|dir| !dir.is_empty())
		.map(PathBuf::from)
		.or_else(dirs::config_dir)?;
	Some(base.join("rsense").join("config.kdl"))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
	ConfigError::InvalidValue {
		key: key.to_string(),
		reason: reason.to_string(),
	}
}

fn value<'a>(node: &'a KdlNode, key: &str) -> Result<&'a KdlValue> {
	node.get(0).ok_or_else(|| invalid(key, "missing value"))
}

fn integer(node: &KdlNode, key: &str) -> Result<i128> {
	value(node, key)?
		.as_integer()
		.ok_or_else(|| invalid(key, "expected an integer"))
}

fn boolean(node: &KdlNode, key: &str) -> Result<bool> {
	value(node, key)?
		.as_bool()
		.ok_or_else(|| invalid(key, "expected #true or #false"))
}

#[cfg(test)]
mod tests;
