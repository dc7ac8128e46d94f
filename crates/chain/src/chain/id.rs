use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CHAIN: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier of a built chain, used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(u64);

impl ChainId {
	/// Allocates the next identifier, starting at 1.
	pub(crate) fn next() -> Self {
		Self(NEXT_CHAIN.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
	}

	/// Returns the raw identifier.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "chain#{}", self.0)
	}
}
