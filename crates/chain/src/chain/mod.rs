use std::borrow::Borrow;
use std::fmt;
use std::mem;
use std::sync::Arc;

use strata_context::Cancellation;

use crate::store::Binding;
use crate::{ChainOptions, Reference, ResolveError};

mod id;

pub use id::ChainId;

/// Link from a node to the rest of the chain.
enum Link<K, V> {
	/// End of every chain. Resolution fails here and release stops here.
	Terminal,
	Node(Box<Node<K, V>>),
}

/// One binding layered over its parent.
struct Node<K, V> {
	/// `None` once the node has been released.
	key: Option<K>,
	value: V,
	cx: Arc<dyn Cancellation>,
	parent: Link<K, V>,
}

impl<K, V: Reference> Node<K, V> {
	/// Releases the bound value and clears the key.
	///
	/// Returns false when the node was already released, in which case every
	/// node beneath it was released too.
	fn release(&mut self, chain: ChainId) -> bool {
		if self.key.is_none() {
			return false;
		}
		if let Some(releasable) = self.value.as_releasable() {
			if let Err(error) = releasable.release() {
				tracing::warn!(%chain, %error, "chain.release.value_failed");
			}
		}
		self.key = None;
		true
	}
}

/// Immutable, cancellation-aware stack of bindings.
///
/// Built by [`BindingStore::build`](crate::BindingStore::build). The most
/// recently registered binding is the outermost node; resolution walks from
/// there towards the terminal node and returns the first exact key match.
pub struct Chain<K, V: Reference> {
	id: ChainId,
	head: Link<K, V>,
	depth: usize,
	released: bool,
	options: ChainOptions,
}

impl<K, V: Reference> Default for Chain<K, V> {
	fn default() -> Self {
		Self::empty(ChainOptions::default())
	}
}

impl<K, V: Reference> Chain<K, V> {
	/// Creates a chain holding only the terminal node.
	pub fn empty(options: ChainOptions) -> Self {
		Self {
			id: ChainId::next(),
			head: Link::Terminal,
			depth: 0,
			released: false,
			options,
		}
	}

	/// Folds `bindings` so the last one becomes the outermost node. Every node
	/// shares the same cancellation source.
	pub(crate) fn from_bindings(bindings: Vec<Binding<K, V>>, cx: impl Cancellation + 'static, options: ChainOptions) -> Self {
		let mut chain = Self::empty(options);
		chain.depth = bindings.len();
		if bindings.is_empty() {
			tracing::debug!(chain = %chain.id, label = chain.options.label.as_deref(), depth = 0, "chain.build");
			return chain;
		}

		let cx: Arc<dyn Cancellation> = Arc::new(cx);
		chain.head = bindings.into_iter().fold(Link::Terminal, |parent, binding| {
			let (key, value) = binding.into_parts();
			Link::Node(Box::new(Node {
				key: Some(key),
				value,
				cx: Arc::clone(&cx),
				parent,
			}))
		});
		tracing::debug!(chain = %chain.id, label = chain.options.label.as_deref(), depth = chain.depth, "chain.build");
		chain
	}

	/// Returns the value bound to `key` by the outermost matching node.
	///
	/// The cancellation source is checked at every node before its key is
	/// compared, so a fired source wins over a match.
	///
	/// # Errors
	///
	/// * [`ResolveError::Cancelled`] when the source has fired.
	/// * [`ResolveError::NotFound`] when no live node binds `key`, including
	///   after [`Self::release`].
	pub fn resolve<Q>(&self, key: &Q) -> Result<&V, ResolveError>
	where
		K: Borrow<Q>,
		Q: Eq + ?Sized,
	{
		let mut link = &self.head;
		let mut hops = 0_usize;
		loop {
			let node = match link {
				Link::Terminal => {
					tracing::trace!(chain = %self.id, label = self.options.label.as_deref(), hops, "chain.resolve.not_found");
					return Err(ResolveError::NotFound);
				}
				Link::Node(node) => node,
			};
			hops += 1;
			if self.options.trace_hops {
				tracing::trace!(chain = %self.id, label = self.options.label.as_deref(), hop = hops, "chain.resolve.hop");
			}

			if let Some(reason) = node.cx.cancel_reason() {
				tracing::debug!(chain = %self.id, label = self.options.label.as_deref(), hops, reason = reason.as_str(), "chain.resolve.cancelled");
				return Err(ResolveError::Cancelled(reason));
			}
			if node.key.as_ref().is_some_and(|bound| <K as Borrow<Q>>::borrow(bound) == key) {
				return Ok(&node.value);
			}
			link = &node.parent;
		}
	}

	/// Releases every node from the outermost inwards.
	///
	/// Each releasable value is released once; failures it reports are logged
	/// and the cascade continues. Calling this again has no effect.
	pub fn release(&mut self) {
		let id = self.id;
		let mut released = 0_usize;
		let mut link = &mut self.head;
		while let Link::Node(node) = link {
			if !node.release(id) {
				break;
			}
			released += 1;
			link = &mut node.parent;
		}
		if !self.released {
			tracing::debug!(chain = %id, label = self.options.label.as_deref(), released, "chain.release");
		}
		self.released = true;
	}

	/// Returns the number of bindings the chain was built from.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Returns true when the chain holds only the terminal node.
	pub fn is_empty(&self) -> bool {
		matches!(self.head, Link::Terminal)
	}

	/// Returns true once [`Self::release`] has run.
	pub fn is_released(&self) -> bool {
		self.released
	}

	/// Returns the chain's log identifier.
	pub fn id(&self) -> ChainId {
		self.id
	}

	/// Returns the options the chain was built with.
	pub fn options(&self) -> &ChainOptions {
		&self.options
	}
}

impl<K, V: Reference> Drop for Chain<K, V> {
	fn drop(&mut self) {
		if self.options.release_on_drop && !self.released {
			self.release();
		}
		// Unlink iteratively; the default recursive drop overflows on deep chains.
		let mut link = mem::replace(&mut self.head, Link::Terminal);
		while let Link::Node(mut node) = link {
			link = mem::replace(&mut node.parent, Link::Terminal);
		}
	}
}

impl<K, V: Reference> fmt::Debug for Chain<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Chain")
			.field("id", &self.id)
			.field("label", &self.options.label)
			.field("depth", &self.depth)
			.field("released", &self.released)
			.finish_non_exhaustive()
	}
}
