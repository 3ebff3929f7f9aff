//! R syntax: tokenizer, error-tolerant parser, arena syntax trees and their
//! incremental maintenance under edits.

pub mod error;
pub mod incremental;
pub mod kind;
pub mod lexer;
pub mod metrics;
mod parser;
pub mod tree;

pub use error::{Diagnostic, ParseError, Result, TreeViolation};
pub use incremental::{FullReparseReason, TreeManager, UpdateOutcome, UpdateResult};
pub use kind::{SyntaxKind, TokenKind};
pub use metrics::UpdateMetrics;
pub use parser::parse;
pub use tree::{Comment, Node, NodeId, StringLiteral, SyntaxTree};
