use std::fmt;
use std::sync::Arc;

/// Why a context stopped admitting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum CancelReason {
	/// The owner fired the context through its [`CancelHandle`](crate::CancelHandle).
	#[error("context cancelled")]
	Cancelled,
	/// The absolute deadline attached to the context passed.
	#[error("context deadline exceeded")]
	DeadlineExceeded,
	/// The relative timeout attached to the context elapsed.
	#[error("context timed out")]
	TimedOut,
}

impl CancelReason {
	/// Stable name used as a structured log field.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Cancelled => "cancelled",
			Self::DeadlineExceeded => "deadline_exceeded",
			Self::TimedOut => "timed_out",
		}
	}
}

/// Read-only view of a cancellation source.
///
/// Once an implementation reports a reason it must keep reporting the same
/// reason for the rest of its lifetime.
pub trait Cancellation: Send + Sync + fmt::Debug {
	/// Returns the reason the source fired, or `None` while it is live.
	fn cancel_reason(&self) -> Option<CancelReason>;

	/// Returns true once the source has fired.
	fn is_cancelled(&self) -> bool {
		self.cancel_reason().is_some()
	}
}

impl<T: Cancellation + ?Sized> Cancellation for Arc<T> {
	fn cancel_reason(&self) -> Option<CancelReason> {
		(**self).cancel_reason()
	}
}
