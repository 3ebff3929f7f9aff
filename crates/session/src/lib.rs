//! Document sessions for the R analysis engine.
//!
//! A [`DocumentSession`] owns one buffer and its syntax tree, applies edit
//! batches one at a time and dispatches queries against captured trees. The
//! [`DocumentManager`] keeps the open sessions and speaks `lsp-types`.

pub mod error;
pub mod manager;
pub mod protocol;
pub mod session;

pub use error::{Result, SessionError};
pub use manager::DocumentManager;
pub use session::{ChangeRange, DocumentSession, SessionServices, SessionState, TextChange};
