use std::sync::Arc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use rstest::rstest;

use self::support::{Resource, Value};
use crate::{BindingStore, CancelContext, CancelHandle, CancelReason, Chain, RegisterError, ResolveError};


fn register_all(bindings: &[(&'static str, Value)]) -> BindingStore<&'static str, Value> {
	let mut store: BindingStore<&'static str, Value> = BindingStore::new();
	for (key, value) in bindings {
		assert_eq!(store.register(*key, value.clone()), Ok(()));
	}
	store
}

#[test]
fn resolves_each_registered_path() {
	let r1 = Value::Resource(Resource::open("mock"));
	let r2 = Value::Int(102_299);
	let chain = register_all(&[("mock", r1.clone()), ("mock/scalarint", r2.clone())]).build_default();

	assert_eq!(chain.resolve("mock"), Ok(&r1));
	assert_eq!(chain.resolve("mock/scalarint"), Ok(&r2));
	assert_eq!(chain.resolve("missing"), Err(ResolveError::NotFound));
}

#[test]
fn release_closes_resource_and_hides_binding() {
	let resource = Resource::open("k");
	let mut chain = register_all(&[("k", Value::Resource(Arc::clone(&resource)))]).build_default();
	assert!(resource.is_open());

	chain.release();
	assert!(!resource.is_open());
	assert_eq!(chain.resolve("k"), Err(ResolveError::NotFound));
}

#[test]
fn pre_cancelled_context_rejects_bound_paths() {
	let (cx, handle) = CancelContext::background().with_cancel();
	handle.cancel();
	let chain = register_all(&[("k", Value::Int(1))]).build(cx);

	assert_eq!(chain.resolve("k"), Err(ResolveError::Cancelled(CancelReason::Cancelled)));
	assert_eq!(chain.resolve("other"), Err(ResolveError::Cancelled(CancelReason::Cancelled)));
}

#[test]
fn later_registration_wins() {
	let chain = register_all(&[("k", Value::Text("first")), ("k", Value::Text("second"))]).build_default();
	assert_eq!(chain.resolve("k"), Ok(&Value::Text("second")));
}

#[test]
fn missing_key_registration_is_rejected() {
	let mut store: BindingStore<&str, Value> = BindingStore::new();
	assert_eq!(store.register(None, Value::Resource(Resource::open("orphan"))), Err(RegisterError::MissingKey));
	assert!(store.is_empty());
}

#[derive(Debug, Clone, Copy)]
enum Scope {
	/// `build_default`, no caller context.
	Implicit,
	Background,
	Cancelled,
	DeadlinePassed,
	TimedOut,
}

impl Scope {
	fn context(self) -> Option<(CancelContext, Option<CancelHandle>)> {
		let root = CancelContext::background();
		match self {
			Self::Implicit => None,
			Self::Background => Some((root, None)),
			Self::Cancelled => {
				let (cx, handle) = root.with_cancel();
				handle.cancel();
				Some((cx, Some(handle)))
			}
			Self::DeadlinePassed => {
				let (cx, handle) = root.with_deadline(Instant::now());
				Some((cx, Some(handle)))
			}
			Self::TimedOut => {
				let (cx, handle) = root.with_timeout(Duration::from_millis(1));
				std::thread::sleep(Duration::from_millis(2));
				Some((cx, Some(handle)))
			}
		}
	}
}

fn build(store: BindingStore<&'static str, Value>, scope: Scope) -> (Chain<&'static str, Value>, Option<CancelHandle>) {
	match scope.context() {
		None => (store.build_default(), None),
		Some((cx, handle)) => (store.build(cx), handle),
	}
}

fn mixed_bindings() -> Vec<(&'static str, Value)> {
	vec![
		("mock", Value::Unit),
		("mock/scalarint", Value::Int(102_299)),
		("mock/scalarfloat", Value::Float(102_299.9999)),
		("mock/scalarstring", Value::Text("mystring")),
		("mock/scalar/nil", Value::Absent),
		("mock/closeable", Value::Resource(Resource::open("mock/closeable"))),
	]
}

fn numbered_bindings() -> Vec<(&'static str, Value)> {
	vec![
		("mock/1", Value::Unit),
		("mock/2", Value::Int(2)),
		("mock/closeable", Value::Resource(Resource::open("mock/closeable"))),
	]
}

#[rstest]
#[case::finds_all(mixed_bindings(), Scope::Implicit, &["mock", "mock/scalarint", "mock/scalarfloat", "mock/scalarstring", "mock/scalar/nil", "mock/closeable", "mock", "mock/scalarint"], None)]
#[case::finds_all_with_context(numbered_bindings(), Scope::Background, &["mock/1", "mock/2", "mock/closeable"], None)]
#[case::single_miss(numbered_bindings(), Scope::Implicit, &["mock"], Some(ResolveError::NotFound))]
#[case::all_miss(numbered_bindings(), Scope::Implicit, &["mock/notfound1", "mock/notfound2"], Some(ResolveError::NotFound))]
#[case::empty(Vec::new(), Scope::Implicit, &["mock/notfound1", "mock/notfound2"], Some(ResolveError::NotFound))]
#[case::cancelled(numbered_bindings(), Scope::Cancelled, &["mock/1", "mock/2", "mock/closeable"], Some(ResolveError::Cancelled(CancelReason::Cancelled)))]
#[case::deadline(numbered_bindings(), Scope::DeadlinePassed, &["mock/1", "mock/2", "mock/closeable"], Some(ResolveError::Cancelled(CancelReason::DeadlineExceeded)))]
#[case::timeout(numbered_bindings(), Scope::TimedOut, &["mock/1", "mock/2", "mock/closeable"], Some(ResolveError::Cancelled(CancelReason::TimedOut)))]
fn chain_lifecycle(
	#[case] bindings: Vec<(&'static str, Value)>,
	#[case] scope: Scope,
	#[case] paths: &[&'static str],
	#[case] expected: Option<ResolveError>,
) {
	let (mut chain, _handle) = build(register_all(&bindings), scope);
	assert_eq!(chain.depth(), bindings.len());
	assert_eq!(chain.is_empty(), bindings.is_empty());

	for path in paths {
		let resolved = chain.resolve(path);
		match expected {
			Some(err) => assert_eq!(resolved, Err(err), "path {path}"),
			None => {
				let bound = bindings.iter().find(|(key, _)| key == path).map(|(_, value)| value);
				assert_eq!(resolved.ok(), bound, "path {path}");
			}
		}
	}

	chain.release();
	chain.release();
	chain.release();

	for path in paths {
		let resolved = chain.resolve(path);
		match expected {
			Some(err) => assert_eq!(resolved, Err(err), "released path {path}"),
			None => assert_eq!(resolved, Err(ResolveError::NotFound), "released path {path}"),
		}
	}

	for (key, value) in &bindings {
		if let Value::Resource(resource) = value {
			assert!(!resource.is_open(), "{key} left open");
			assert_eq!(resource.releases(), 1, "{key} released more than once");
		}
	}
}
