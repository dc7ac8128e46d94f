//! Layered lookup chains.
//!
//! Bindings are registered into a [`BindingStore`] in precedence order and
//! folded into an immutable [`Chain`]: the last registration becomes the
//! outermost node, so later bindings shadow earlier ones with the same key.
//! Every resolution hop consults the chain's [`Cancellation`] source before
//! matching, and [`Chain::release`] tears the chain down exactly once,
//! releasing every bound value that exposes the [`Releasable`] capability.
//!
//! ```
//! use strata_chain::{BindingStore, ResolveError};
//!
//! let mut store: BindingStore<&str, String> = BindingStore::new();
//! store.register("log.level", "info".to_string()).unwrap();
//! store.register("log.level", "debug".to_string()).unwrap();
//!
//! let chain = store.build_default();
//! assert_eq!(chain.resolve("log.level").map(String::as_str), Ok("debug"));
//! assert_eq!(chain.resolve("log.format"), Err(ResolveError::NotFound));
//! ```

/// Resolution chain nodes, traversal and release.
pub mod chain;
/// Error types for registration, resolution and release.
pub mod error;
/// Chain configuration.
pub mod options;
/// Capability traits for bound values.
pub mod reference;
/// Ordered binding accumulation.
pub mod store;

#[cfg(test)]
mod tests;

pub use chain::{Chain, ChainId};
pub use error::{RegisterError, ReleaseError, ResolveError};
pub use options::ChainOptions;
pub use reference::{Inert, Reference, Releasable};
pub use store::{Binding, BindingStore};
pub use strata_context::{CancelContext, CancelHandle, CancelReason, Cancellation};
