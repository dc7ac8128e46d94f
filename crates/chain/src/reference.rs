use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::ReleaseError;

/// Deterministic cleanup a bound value may expose.
///
/// Called at most once per binding, when the chain holding the value is
/// released.
pub trait Releasable {
	/// Releases the resources held by the value.
	fn release(&self) -> Result<(), ReleaseError>;
}

/// A value that can be bound into a chain.
///
/// Values without cleanup keep the default implementation. Values with
/// cleanup return themselves:
///
/// ```
/// use strata_chain::{Reference, Releasable, ReleaseError};
///
/// struct Pool;
///
/// impl Releasable for Pool {
/// 	fn release(&self) -> Result<(), ReleaseError> {
/// 		Ok(())
/// 	}
/// }
///
/// impl Reference for Pool {
/// 	fn as_releasable(&self) -> Option<&dyn Releasable> {
/// 		Some(self)
/// 	}
/// }
/// ```
pub trait Reference {
	/// Returns the value's release capability, if it has one.
	fn as_releasable(&self) -> Option<&dyn Releasable> {
		None
	}
}

/// `None` is a valid bound value with nothing to release.
impl<T: Reference> Reference for Option<T> {
	fn as_releasable(&self) -> Option<&dyn Releasable> {
		self.as_ref().and_then(Reference::as_releasable)
	}
}

impl<T: Reference + ?Sized> Reference for Box<T> {
	fn as_releasable(&self) -> Option<&dyn Releasable> {
		(**self).as_releasable()
	}
}

impl<T: Reference + ?Sized> Reference for Arc<T> {
	fn as_releasable(&self) -> Option<&dyn Releasable> {
		(**self).as_releasable()
	}
}

impl<T: Reference + ?Sized> Reference for Rc<T> {
	fn as_releasable(&self) -> Option<&dyn Releasable> {
		(**self).as_releasable()
	}
}

macro_rules! inert_references {
	($($ty:ty),* $(,)?) => {
		$(impl Reference for $ty {})*
	};
}

inert_references!(
	(),
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	&'static str,
	Duration,
	Instant,
	SystemTime,
);

/// Wrapper binding an arbitrary value with nothing to release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Inert<T>(pub T);

impl<T> Inert<T> {
	/// Unwraps the inner value.
	pub fn into_inner(self) -> T {
		self.0
	}
}

impl<T> Deref for Inert<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0
	}
}

impl<T> Reference for Inert<T> {}
