use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::{CancelReason, Cancellation};

/// Point in time after which a context fires, with the reason it fires with.
#[derive(Debug, Clone, Copy)]
struct Expiry {
	at: Instant,
	reason: CancelReason,
}

#[derive(Debug)]
struct Inner {
	token: CancellationToken,
	fired: OnceLock<CancelReason>,
	expiry: Option<Expiry>,
	parent: Option<CancelContext>,
}

/// Shared, cloneable cancellation context.
///
/// Clones observe the same state. The first reason a context fires with is
/// latched and reported forever after, so a context never "un-cancels" and
/// never changes its reason.
#[derive(Debug, Clone)]
pub struct CancelContext {
	inner: Arc<Inner>,
}

impl Default for CancelContext {
	fn default() -> Self {
		Self::background()
	}
}

impl CancelContext {
	/// Creates a root context that never fires.
	pub fn background() -> Self {
		Self {
			inner: Arc::new(Inner {
				token: CancellationToken::new(),
				fired: OnceLock::new(),
				expiry: None,
				parent: None,
			}),
		}
	}

	/// Derives a child that fires when `handle.cancel()` is called or when
	/// this context fires.
	pub fn with_cancel(&self) -> (Self, CancelHandle) {
		self.derive(None)
	}

	/// Derives a child that additionally fires with
	/// [`CancelReason::DeadlineExceeded`] once `at` has passed.
	pub fn with_deadline(&self, at: Instant) -> (Self, CancelHandle) {
		self.derive(Some(Expiry {
			at,
			reason: CancelReason::DeadlineExceeded,
		}))
	}

	/// Derives a child that additionally fires with [`CancelReason::TimedOut`]
	/// once `timeout` has elapsed from now.
	///
	/// A timeout too large to represent never expires.
	pub fn with_timeout(&self, timeout: Duration) -> (Self, CancelHandle) {
		let expiry = Instant::now().checked_add(timeout).map(|at| Expiry {
			at,
			reason: CancelReason::TimedOut,
		});
		self.derive(expiry)
	}

	fn derive(&self, expiry: Option<Expiry>) -> (Self, CancelHandle) {
		let child = Self {
			inner: Arc::new(Inner {
				token: self.inner.token.child_token(),
				fired: OnceLock::new(),
				expiry,
				parent: Some(self.clone()),
			}),
		};
		let handle = CancelHandle { ctx: child.clone() };
		(child, handle)
	}

	/// Returns the reason this context fired, or `None` while it is live.
	///
	/// Ancestors are consulted before this context's own expiry.
	pub fn cancel_reason(&self) -> Option<CancelReason> {
		if let Some(reason) = self.inner.fired.get() {
			return Some(*reason);
		}
		let observed = self
			.inner
			.parent
			.as_ref()
			.and_then(CancelContext::cancel_reason)
			.or_else(|| self.expired())?;
		Some(self.fire(observed))
	}

	/// Returns true once the context has fired.
	pub fn is_cancelled(&self) -> bool {
		self.cancel_reason().is_some()
	}

	/// Returns the earliest expiry governing this context, including
	/// inherited ones.
	pub fn deadline(&self) -> Option<Instant> {
		let own = self.inner.expiry.map(|expiry| expiry.at);
		let inherited = self.inner.parent.as_ref().and_then(CancelContext::deadline);
		match (own, inherited) {
			(Some(own), Some(inherited)) => Some(own.min(inherited)),
			(own, inherited) => own.or(inherited),
		}
	}

	/// Waits until the context fires and returns the reason.
	///
	/// Never completes for a context with no handle and no expiry anywhere in
	/// its ancestry.
	pub async fn done(&self) -> CancelReason {
		loop {
			if let Some(reason) = self.cancel_reason() {
				return reason;
			}
			match self.deadline() {
				Some(at) => {
					tokio::select! {
						() = self.inner.token.cancelled() => {}
						() = tokio::time::sleep_until(tokio::time::Instant::from_std(at)) => {}
					}
				}
				None => self.inner.token.cancelled().await,
			}
		}
	}

	fn expired(&self) -> Option<CancelReason> {
		self.inner
			.expiry
			.filter(|expiry| Instant::now() >= expiry.at)
			.map(|expiry| expiry.reason)
	}

	fn fire(&self, reason: CancelReason) -> CancelReason {
		let latched = *self.inner.fired.get_or_init(|| {
			tracing::trace!(reason = reason.as_str(), "context.fire");
			reason
		});
		self.inner.token.cancel();
		latched
	}
}

impl Cancellation for CancelContext {
	fn cancel_reason(&self) -> Option<CancelReason> {
		CancelContext::cancel_reason(self)
	}
}

/// Owner-side trigger for a derived [`CancelContext`].
///
/// Dropping the handle does not fire the context.
#[derive(Debug, Clone)]
pub struct CancelHandle {
	ctx: CancelContext,
}

impl CancelHandle {
	/// Fires the context with [`CancelReason::Cancelled`].
	///
	/// Has no effect when the context already fired, including when its
	/// expiry passed before this call.
	pub fn cancel(&self) {
		if self.ctx.cancel_reason().is_none() {
			let reason = self.ctx.fire(CancelReason::Cancelled);
			tracing::debug!(reason = reason.as_str(), "context.cancel");
		}
	}

	/// Returns the context this handle fires.
	pub fn context(&self) -> &CancelContext {
		&self.ctx
	}
}
