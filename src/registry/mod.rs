//! The process-wide registry holding the active configuration loader state.
//!
//! All mutation goes through [`GlobalRegistry::install`], [`GlobalRegistry::clear`]
//! and [`GlobalRegistry::restore`]. Each call is atomic on its own, but a
//! snapshot/initialize/restore sequence assumes a single writer.

pub mod state;

pub use state::{RegistryState, Snapshot};

use crate::search_path::ConfigSearchPath;
use std::sync::{Mutex, MutexGuard, PoisonError};

static GLOBAL: GlobalRegistry = GlobalRegistry::new();

/// Holder of at most one [`RegistryState`].
#[derive(Debug, Default)]
pub struct GlobalRegistry {
	state: Mutex<Option<RegistryState>>,
}

impl GlobalRegistry {
	/// Create an empty, standalone registry.
	pub const fn new() -> Self {
		GlobalRegistry {
			state: Mutex::new(None),
		}
	}

	/// The registry shared by the whole process.
	pub fn global() -> &'static GlobalRegistry {
		&GLOBAL
	}

	pub fn is_initialized(&self) -> bool {
		self.lock().is_some()
	}

	/// Replace the current state. Nothing is merged with what was there before.
	pub fn install(&self, state: RegistryState) {
		tracing::debug!(
			job_name = %state.job_name,
			entries = state.search_path.len(),
			"Installing registry state"
		);
		*self.lock() = Some(state);
	}

	pub fn clear(&self) {
		tracing::debug!("Clearing registry state");
		*self.lock() = None;
	}

	pub fn snapshot(&self) -> Snapshot {
		Snapshot(self.lock().clone())
	}

	/// Put back exactly what `snapshot` captured, including an empty registry.
	pub fn restore(&self, snapshot: Snapshot) {
		tracing::debug!(initialized = snapshot.is_initialized(), "Restoring registry state");
		*self.lock() = snapshot.0;
	}

	/// A copy of the live state, if any.
	pub fn current(&self) -> Option<RegistryState> {
		self.lock().clone()
	}

	pub fn job_name(&self) -> Option<String> {
		self.lock().as_ref().map(|state| state.job_name.clone())
	}

	pub fn search_path(&self) -> Option<ConfigSearchPath> {
		self.lock().as_ref().map(|state| state.search_path.clone())
	}

	// The state is plain data, so a panic while holding the lock cannot leave it half-written.
	fn lock(&self) -> MutexGuard<'_, Option<RegistryState>> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::caller::CallerContext;
	use crate::search_path::{Schema, SearchPathEntry};

	fn state(job_name: &str) -> RegistryState {
		let mut search_path = ConfigSearchPath::new();
		search_path.append(SearchPathEntry::new(
			"main",
			format!("/conf/{job_name}"),
			Schema::FileSystem,
		));
		RegistryState {
			search_path,
			job_name: job_name.to_string(),
			strict: None,
			caller: CallerContext::Interactive,
		}
	}

	#[test]
	fn test_install_and_clear() {
		let registry = GlobalRegistry::new();
		assert!(!registry.is_initialized());

		registry.install(state("first"));
		assert!(registry.is_initialized());
		assert_eq!(registry.job_name().as_deref(), Some("first"));

		registry.clear();
		assert!(!registry.is_initialized());
		assert!(registry.current().is_none());
	}

	#[test]
	fn test_install_replaces_without_merge() {
		let registry = GlobalRegistry::new();
		registry.install(state("first"));
		registry.install(state("second"));

		assert_eq!(registry.current(), Some(state("second")));
		assert_eq!(registry.search_path().map(|sp| sp.len()), Some(1));
	}

	#[test]
	fn test_snapshot_is_independent() {
		let registry = GlobalRegistry::new();
		registry.install(state("first"));

		let snapshot = registry.snapshot();
		registry.install(state("second"));
		registry.clear();

		assert_eq!(snapshot.state(), Some(&state("first")));

		registry.restore(snapshot);
		assert_eq!(registry.current(), Some(state("first")));
	}

	#[test]
	fn test_restore_absent() {
		let registry = GlobalRegistry::new();
		let snapshot = registry.snapshot();
		assert!(!snapshot.is_initialized());

		registry.install(state("first"));
		registry.restore(snapshot);

		assert!(!registry.is_initialized());
	}

	#[test]
	fn test_poisoned_lock_still_usable() {
		let registry = GlobalRegistry::new();
		registry.install(state("first"));

		let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
			let _guard = registry.state.lock().unwrap();
			panic!("poison the lock");
		}));

		assert_eq!(registry.job_name().as_deref(), Some("first"));
		registry.clear();
		assert!(!registry.is_initialized());
	}
}
