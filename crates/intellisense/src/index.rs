//! Function signature index.
//!
//! [`FunctionIndex`] is the service providers query for signatures by name.
//! [`SymbolIndex`] is the shipped implementation: a copy-on-write map that is
//! seeded up front and/or filled lazily from a [`SignatureLoader`]. Readers
//! never block; writers publish a new map with [`ArcSwap::rcu`].

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rsense_primitives::BoxFutureSend;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::signature::FunctionSignature;

/// Queryable source of function signatures.
pub trait FunctionIndex: Send + Sync {
	/// All signatures known under `name`; empty when unknown.
	fn lookup<'a>(&'a self, name: &'a str) -> BoxFutureSend<'a, Vec<Arc<FunctionSignature>>>;

	/// Names with at least one known signature, sorted.
	fn names(&self) -> BoxFutureSend<'_, Vec<Arc<str>>>;
}

/// Populates a [`SymbolIndex`] on lookup misses.
pub trait SignatureLoader: Send + Sync {
	fn load<'a>(&'a self, name: &'a str) -> BoxFutureSend<'a, Vec<FunctionSignature>>;
}

#[derive(Debug, Clone)]
enum Entry {
	Known(Vec<Arc<FunctionSignature>>),
	/// Looked up and not found; not retried.
	Missing,
}

type Entries = FxHashMap<Arc<str>, Entry>;

pub struct SymbolIndex {
	entries: ArcSwap<Entries>,
	loader: Option<Arc<dyn SignatureLoader>>,
}

impl Default for SymbolIndex {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for SymbolIndex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SymbolIndex")
			.field("entries", &self.entries.load().len())
			.field("loader", &self.loader.is_some())
			.finish()
	}
}

impl SymbolIndex {
	pub fn new() -> Self {
		Self {
			entries: ArcSwap::from_pointee(Entries::default()),
			loader: None,
		}
	}

	/// Index that asks `loader` for names it has not seen yet.
	pub fn with_loader(loader: Arc<dyn SignatureLoader>) -> Self {
		Self {
			loader: Some(loader),
			..Self::new()
		}
	}

	pub fn from_signatures(signatures: impl IntoIterator<Item = FunctionSignature>) -> Self {
		let index = Self::new();
		index.extend(signatures);
		index
	}

	/// Seeds from a JSON array of signatures.
	pub fn from_json(json: &str) -> Result<Self> {
		let signatures: Vec<FunctionSignature> = serde_json::from_str(json)?;
		Ok(Self::from_signatures(signatures))
	}

	pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|error| IndexError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let index = Self::from_json(&json)?;
		debug!(path = %path.display(), names = index.len(), "index.loaded");
		Ok(index)
	}

	/// Adds signatures, appending to any already known under the same name.
	pub fn extend(&self, signatures: impl IntoIterator<Item = FunctionSignature>) {
		let signatures: Vec<Arc<FunctionSignature>> = signatures.into_iter().map(Arc::new).collect();
		if signatures.is_empty() {
			return;
		}
		self.entries.rcu(|current| {
			let mut next = Entries::clone(current);
			for signature in &signatures {
				let slot = next
					.entry(Arc::from(signature.name.as_str()))
					.or_insert(Entry::Missing);
				match slot {
					Entry::Known(known) => known.push(Arc::clone(signature)),
					Entry::Missing => *slot = Entry::Known(vec![Arc::clone(signature)]),
				}
			}
			next
		});
	}

	/// Number of names with known signatures.
	pub fn len(&self) -> usize {
		self.entries
			.load()
			.values()
			.filter(|e| matches!(e, Entry::Known(_)))
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Cached answer for `name`: `None` if never looked up.
	fn cached(&self, name: &str) -> Option<Vec<Arc<FunctionSignature>>> {
		match self.entries.load().get(name)? {
			Entry::Known(signatures) => Some(signatures.clone()),
			Entry::Missing => Some(Vec::new()),
		}
	}

	fn record(&self, name: &str, loaded: &[Arc<FunctionSignature>]) {
		self.entries.rcu(|current| {
			let mut next = Entries::clone(current);
			// A concurrent loader may have won; keep its answer.
			next.entry(Arc::from(name)).or_insert_with(|| {
				if loaded.is_empty() {
					Entry::Missing
				} else {
					Entry::Known(loaded.to_vec())
				}
			});
			next
		});
	}
}

impl FunctionIndex for SymbolIndex {
	fn lookup<'a>(&'a self, name: &'a str) -> BoxFutureSend<'a, Vec<Arc<FunctionSignature>>> {
		Box::pin(async move {
			if let Some(hit) = self.cached(name) {
				return hit;
			}
			let Some(loader) = &self.loader else {
				return Vec::new();
			};

			let loaded: Vec<Arc<FunctionSignature>> = loader.load(name).await.into_iter().map(Arc::new).collect();
			debug!(name, found = loaded.len(), "index.miss");
			self.record(name, &loaded);
			self.cached(name).unwrap_or(loaded)
		})
	}

	fn names(&self) -> BoxFutureSend<'_, Vec<Arc<str>>> {
		Box::pin(async move {
			let entries = self.entries.load_full();
			let mut names: Vec<Arc<str>> = entries
				.iter()
				.filter(|(_, e)| matches!(e, Entry::Known(_)))
				.map(|(name, _)| Arc::clone(name))
				.collect();
			names.sort();
			names
		})
	}
}
