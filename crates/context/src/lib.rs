//! Cancellation contexts observed by lookup chains.
//!
//! A [`CancelContext`] is a read-only signal: it reports whether the work it
//! governs should stop and, if so, why. Contexts form a tree. Children are
//! derived with [`CancelContext::with_cancel`], [`CancelContext::with_deadline`]
//! or [`CancelContext::with_timeout`] and fire whenever their parent fires.
//! The paired [`CancelHandle`] is the only way to fire a context explicitly.
//!
//! Consumers that only need to observe cancellation depend on the
//! [`Cancellation`] trait rather than the concrete context type.

mod context;
mod reason;


pub use context::{CancelContext, CancelHandle};
pub use reason::{CancelReason, Cancellation};
