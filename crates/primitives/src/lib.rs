//! Core text types: versioned buffers, immutable snapshots, edits and
//! offset/line-column mapping.

/// Versioned mutable text buffer and its immutable snapshots.
pub mod buffer;
/// Text edit descriptors.
pub mod edit;
/// Buffer error types.
pub mod error;
/// Async future aliases.
pub mod future;
/// Line/column positions and column encodings.
pub mod position;
/// Character offsets and half-open text ranges.
pub mod range;
/// Rope utilities and extensions.
pub mod rope;

pub use buffer::{Snapshot, TextBuffer};
pub use edit::{AppliedEdit, TextEdit};
pub use error::{BufferError, Result};
pub use future::BoxFutureSend;
pub use position::{LineCol, OffsetEncoding};
pub use range::{CharIdx, CharLen, TextRange};
pub use ropey::{Rope, RopeSlice};
