use crate::caller::{CallStack, DetectCaller};
use crate::error::Result;
use crate::init::api::install_request;
use crate::init::request::InitRequest;
use crate::registry::{GlobalRegistry, Snapshot};

/// RAII guard for a temporary initialization.
///
/// Created by snapshotting the registry and then initializing it. Dropping the
/// guard restores the snapshot, whether the scope ends normally, through `?`,
/// or by unwinding. Guards nest: each restores exactly what it captured.
#[must_use = "the registry is restored as soon as the scope guard is dropped"]
#[derive(Debug)]
pub struct InitScope<'a> {
	registry: &'a GlobalRegistry,
	saved: Option<Snapshot>,
}

impl<'a> InitScope<'a> {
	/// Snapshot `registry`, then install the state for `request`.
	///
	/// On failure the registry is left as it was and no guard is returned.
	pub fn enter(
		registry: &'a GlobalRegistry,
		detector: &impl DetectCaller,
		request: &InitRequest,
	) -> Result<Self> {
		let scope = InitScope {
			registry,
			saved: Some(registry.snapshot()),
		};
		install_request(registry, detector, request)?;
		Ok(scope)
	}

	pub fn registry(&self) -> &'a GlobalRegistry {
		self.registry
	}
}

impl Drop for InitScope<'_> {
	fn drop(&mut self) {
		if let Some(saved) = self.saved.take() {
			self.registry.restore(saved);
		}
	}
}

/// Scoped form of [`initialize`](crate::init::initialize).
#[track_caller]
pub fn initialize_scoped(
	config_path: Option<&str>,
	job_name: Option<&str>,
	caller_stack_depth: usize,
) -> Result<InitScope<'static>> {
	let request = InitRequest {
		job_name: job_name.map(str::to_string),
		..InitRequest::config_path(config_path)
	}
	.with_caller_stack_depth(caller_stack_depth);
	scoped_from(&request)
}

/// Scoped form of [`initialize_config_module`](crate::init::initialize_config_module).
#[track_caller]
pub fn initialize_config_module_scoped(
	config_module: &str,
	job_name: &str,
) -> Result<InitScope<'static>> {
	let request = InitRequest::config_module(config_module).with_job_name(job_name);
	scoped_from(&request)
}

/// Scoped form of [`initialize_config_dir`](crate::init::initialize_config_dir).
#[track_caller]
pub fn initialize_config_dir_scoped(
	config_dir: &str,
	job_name: Option<&str>,
	caller_stack_depth: usize,
) -> Result<InitScope<'static>> {
	let request = InitRequest {
		job_name: job_name.map(str::to_string),
		..InitRequest::config_dir(config_dir)
	}
	.with_caller_stack_depth(caller_stack_depth);
	scoped_from(&request)
}

/// Enter a scope on the global registry, detecting the caller from the call site.
#[track_caller]
pub fn scoped_from(request: &InitRequest) -> Result<InitScope<'static>> {
	let stack = CallStack::capture();
	InitScope::enter(GlobalRegistry::global(), &stack, request)
}

/// Run `body` with `request` installed on the global registry, then restore.
#[track_caller]
pub fn with_scope<R>(request: &InitRequest, body: impl FnOnce() -> R) -> Result<R> {
	let _scope = scoped_from(request)?;
	Ok(body())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::caller::Frame;
	use crate::error::InitError;

	fn script() -> CallStack {
		CallStack::from_callers([Frame::file("/a/b/run.py")])
	}

	fn job(registry: &GlobalRegistry) -> Option<String> {
		registry.job_name()
	}

	#[test]
	fn test_scope_restores_absent() {
		let registry = GlobalRegistry::new();
		{
			let _scope = InitScope::enter(&registry, &script(), &InitRequest::config_path(None))
				.unwrap();
			assert!(registry.is_initialized());
		}
		assert!(!registry.is_initialized());
	}

	#[test]
	fn test_scope_restores_previous_state() {
		let registry = GlobalRegistry::new();
		install_request(
			&registry,
			&script(),
			&InitRequest::config_path(None).with_job_name("outer"),
		)
		.unwrap();
		let before = registry.current();

		{
			let request = InitRequest::config_dir("/tmp/conf").with_job_name("inner");
			let _scope = InitScope::enter(&registry, &script(), &request).unwrap();
			assert_eq!(job(&registry).as_deref(), Some("inner"));
		}

		assert_eq!(registry.current(), before);
	}

	#[test]
	fn test_nested_scopes_restore_lifo() {
		let registry = GlobalRegistry::new();

		let s1 = InitScope::enter(
			&registry,
			&script(),
			&InitRequest::config_path(None).with_job_name("s1"),
		)
		.unwrap();
		let s1_state = registry.current();

		let s2 = InitScope::enter(
			&registry,
			&script(),
			&InitRequest::config_path(None).with_job_name("s2"),
		)
		.unwrap();
		assert_eq!(job(&registry).as_deref(), Some("s2"));

		drop(s2);
		assert_eq!(registry.current(), s1_state);

		drop(s1);
		assert!(!registry.is_initialized());
	}

	#[test]
	fn test_scope_restores_after_body_error() {
		let registry = GlobalRegistry::new();

		let run = || -> Result<()> {
			let _scope =
				InitScope::enter(&registry, &script(), &InitRequest::config_path(Some("conf")))?;
			Err(InitError::Detection {
				depth: 9,
				available: 0,
			})
		};

		assert!(run().is_err());
		assert!(!registry.is_initialized());
	}

	#[test]
	fn test_scope_restores_after_panic() {
		let registry = GlobalRegistry::new();

		let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
			let _scope =
				InitScope::enter(&registry, &script(), &InitRequest::config_path(None)).unwrap();
			panic!("body failed");
		}));

		assert!(result.is_err());
		assert!(!registry.is_initialized());
	}

	#[test]
	fn test_failed_enter_leaves_registry_untouched() {
		let registry = GlobalRegistry::new();
		install_request(
			&registry,
			&script(),
			&InitRequest::config_path(None).with_job_name("kept"),
		)
		.unwrap();

		let module = CallStack::from_callers([Frame::module("pkg.runner")]);
		let result = InitScope::enter(&registry, &module, &InitRequest::config_dir("relative"));

		assert!(matches!(result, Err(InitError::UnsupportedCaller { .. })));
		assert_eq!(job(&registry).as_deref(), Some("kept"));
	}
}
