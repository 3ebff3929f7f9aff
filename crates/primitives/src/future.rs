//! Boxed future alias for object-safe async traits.

use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that can move between threads.
///
/// Provider and index traits return this so they stay usable as
/// `Arc<dyn Trait>`.
pub type BoxFutureSend<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
