use crate::caller::CallerContext;
use crate::search_path::ConfigSearchPath;

/// The configuration loader state installed by an initialization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
	/// Where configuration will be looked up, in priority order.
	pub search_path: ConfigSearchPath,

	/// Label for the current run, used for logging and output naming downstream.
	pub job_name: String,

	/// Deprecated strict-mode flag, passed through untouched.
	pub strict: Option<bool>,

	/// The caller this state was built for.
	pub caller: CallerContext,
}

/// A detached copy of the registry contents, including the uninitialized case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(pub(crate) Option<RegistryState>);

impl Snapshot {
	pub fn state(&self) -> Option<&RegistryState> {
		self.0.as_ref()
	}

	pub fn is_initialized(&self) -> bool {
		self.0.is_some()
	}
}
