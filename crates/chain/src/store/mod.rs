use strata_context::{CancelContext, Cancellation};

use crate::{Chain, ChainOptions, Reference, RegisterError};


/// One registered `(key, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<K, V> {
	key: K,
	value: V,
}

impl<K, V> Binding<K, V> {
	/// Returns the bound key.
	pub fn key(&self) -> &K {
		&self.key
	}

	/// Returns the bound value.
	pub fn value(&self) -> &V {
		&self.value
	}

	/// Splits the binding into its key and value.
	pub fn into_parts(self) -> (K, V) {
		(self.key, self.value)
	}
}

/// Append-only, ordered collection of bindings.
///
/// Registration order is override precedence: when a chain is built, later
/// bindings shadow earlier bindings with an equal key. Duplicate keys are
/// retained.
#[derive(Debug, Clone)]
pub struct BindingStore<K, V> {
	bindings: Vec<Binding<K, V>>,
}

impl<K, V> Default for BindingStore<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> BindingStore<K, V> {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self { bindings: Vec::new() }
	}

	/// Appends a binding.
	///
	/// # Errors
	///
	/// Returns [`RegisterError::MissingKey`] when `key` is `None`; the store is
	/// left unchanged.
	pub fn register(&mut self, key: impl Into<Option<K>>, value: V) -> Result<(), RegisterError> {
		let Some(key) = key.into() else {
			tracing::debug!(bindings = self.bindings.len(), "store.register.missing_key");
			return Err(RegisterError::MissingKey);
		};
		tracing::trace!(index = self.bindings.len(), "store.register");
		self.bindings.push(Binding { key, value });
		Ok(())
	}

	/// Returns the number of registered bindings.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Returns true when nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// Iterates bindings in registration order.
	pub fn iter(&self) -> std::slice::Iter<'_, Binding<K, V>> {
		self.bindings.iter()
	}
}

impl<K, V: Reference> BindingStore<K, V> {
	/// Builds a chain governed by `cx` with default options.
	pub fn build(self, cx: impl Cancellation + 'static) -> Chain<K, V> {
		self.build_with(cx, ChainOptions::default())
	}

	/// Builds a chain governed by a context that never fires.
	pub fn build_default(self) -> Chain<K, V> {
		self.build(CancelContext::background())
	}

	/// Builds a chain governed by `cx` with explicit options.
	pub fn build_with(self, cx: impl Cancellation + 'static, options: ChainOptions) -> Chain<K, V> {
		Chain::from_bindings(self.bindings, cx, options)
	}
}

impl<'a, K, V> IntoIterator for &'a BindingStore<K, V> {
	type Item = &'a Binding<K, V>;
	type IntoIter = std::slice::Iter<'a, Binding<K, V>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
