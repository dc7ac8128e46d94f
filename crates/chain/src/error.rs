use strata_context::CancelReason;

/// Registration failures. The store is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
	/// The binding was registered without a key.
	#[error("binding key is missing")]
	MissingKey,
}

/// Resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// The walk reached the end of the chain without a matching key.
	#[error("no binding for key")]
	NotFound,
	/// The chain's cancellation source fired before a match was returned.
	#[error("resolution cancelled: {0}")]
	Cancelled(#[from] CancelReason),
}

impl ResolveError {
	/// Returns the cancellation reason, if this is a cancellation.
	pub const fn cancel_reason(&self) -> Option<CancelReason> {
		match self {
			Self::NotFound => None,
			Self::Cancelled(reason) => Some(*reason),
		}
	}

	/// Returns true when nothing was bound under the key.
	pub const fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound)
	}
}

/// Failure reported by a value's own cleanup.
///
/// Chains log these and keep releasing; they never reach the caller of
/// [`Chain::release`](crate::Chain::release).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("release failed: {message}")]
pub struct ReleaseError {
	message: String,
}

impl ReleaseError {
	/// Creates a release error with a human-readable cause.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	/// Returns the cause.
	pub fn message(&self) -> &str {
		&self.message
	}
}
