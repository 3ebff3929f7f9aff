//! Code intelligence for R documents: completions, signature help and hover.
//!
//! Every query runs against an [`IntellisenseContext`] capturing one tree and
//! position. Providers are registered explicitly in a [`ProviderRegistry`]
//! and consult a shared [`FunctionIndex`] for signatures the document does
//! not define itself.

pub mod arguments;
pub mod brace;
pub mod completion;
pub mod context;
pub mod error;
pub mod filter;
pub mod hover;
pub mod index;
pub mod registry;
pub mod signature;
pub mod signature_help;
pub mod symbols;

pub use brace::BraceCompletion;
pub use completion::{Candidate, CandidateSource, CompletionItem, CompletionKind, CompletionList, CompletionProvider};
pub use context::{DocumentId, IntellisenseContext};
pub use error::{IndexError, Result};
pub use hover::{Hover, HoverProvider};
pub use index::{FunctionIndex, SignatureLoader, SymbolIndex};
pub use registry::ProviderRegistry;
pub use signature::{FormalParameter, FunctionSignature, SignatureLabel};
pub use signature_help::{ParameterInfo, SignatureHelp, SignatureInfo, SignatureProvider};
