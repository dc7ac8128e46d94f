use serde::Deserialize;

/// Per-chain settings.
///
/// Deserializes from a kebab-case table with every field optional, so hosts
/// can embed it in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChainOptions {
	/// Name attached to the chain's log events.
	pub label: Option<String>,
	/// Emit a trace event for every node visited during resolution.
	pub trace_hops: bool,
	/// Run the release protocol when an unreleased chain is dropped.
	pub release_on_drop: bool,
}

impl Default for ChainOptions {
	fn default() -> Self {
		Self {
			label: None,
			trace_hops: false,
			release_on_drop: true,
		}
	}
}

impl ChainOptions {
	/// Sets the log label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Enables or disables per-hop trace events.
	pub fn trace_hops(mut self, enabled: bool) -> Self {
		self.trace_hops = enabled;
		self
	}

	/// Enables or disables release on drop.
	pub fn release_on_drop(mut self, enabled: bool) -> Self {
		self.release_on_drop = enabled;
		self
	}
}
