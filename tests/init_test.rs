//! Tests for the initialization entry points against the process-wide registry.
//!
//! Every test here mutates the global registry, so they run serially and
//! start from a cleared registry.

mod support;

use cfgboot::caller::CallStack;
use cfgboot::init::{InitRequest, install_request, with_scope};
use cfgboot::search_path::{BUILTIN_PROVIDER, Schema};
use cfgboot::{
	GlobalRegistry, InitError, initialize, initialize_config_dir, initialize_config_dir_scoped,
	initialize_config_module, initialize_config_module_scoped, initialize_scoped,
};
use serial_test::serial;
use std::path::{Path, PathBuf};

fn registry() -> &'static GlobalRegistry {
	let registry = GlobalRegistry::global();
	registry.clear();
	registry
}

fn this_dir() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests")
}

/// RAII guard for temporarily changing the current working directory.
struct CwdGuard {
	original_dir: PathBuf,
}

impl CwdGuard {
	fn new(dir: &Path) -> Self {
		let original_dir = std::env::current_dir().expect("Failed to get current directory");
		std::env::set_current_dir(dir).expect("Failed to set current directory");
		Self { original_dir }
	}
}

impl Drop for CwdGuard {
	fn drop(&mut self) {
		let _ = std::env::set_current_dir(&self.original_dir);
	}
}

#[test]
#[serial]
fn test_initialize_relative_to_calling_file() {
	let registry = registry();
	initialize(Some("conf"), None, 1).unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "init_test");
	assert_eq!(
		state.caller.calling_file(),
		Some(this_dir().join("init_test.rs").as_path())
	);

	let entries = state.search_path.entries();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].path, this_dir().join("conf").to_string_lossy());
	assert_eq!(entries[0].schema, Schema::FileSystem);
	assert_eq!(entries[1].provider, BUILTIN_PROVIDER);
}

#[test]
#[serial]
fn test_initialize_with_fixed_job_name() {
	let registry = registry();
	initialize(None, Some("app"), 1).unwrap();

	assert_eq!(registry.job_name().as_deref(), Some("app"));
	assert_eq!(registry.search_path().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_initialize_beyond_call_stack_fails() {
	let registry = registry();
	let result = initialize(Some("conf"), None, 100_000);

	assert!(matches!(
		result,
		Err(InitError::Detection {
			depth: 100_000,
			..
		})
	));
	assert!(!registry.is_initialized());
}

#[test]
#[serial]
fn test_wrapper_anchors_at_its_caller() {
	let registry = registry();
	support::initialize_for_caller("conf").unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "init_test");
	assert_eq!(
		state.caller.calling_file(),
		Some(this_dir().join("init_test.rs").as_path())
	);
	assert_eq!(
		state.search_path.entries()[0].path,
		this_dir().join("conf").to_string_lossy()
	);
}

#[test]
#[serial]
fn test_wrapper_depth_one_anchors_at_wrapper() {
	let registry = registry();
	support::initialize_here("conf").unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "mod");
	assert_eq!(
		state.search_path.entries()[0].path,
		this_dir().join("support/conf").to_string_lossy()
	);
}

#[test]
#[serial]
fn test_relative_path_independent_of_cwd() {
	let registry = registry();
	let temp_dir = tempfile::tempdir().unwrap();
	let _cwd_guard = CwdGuard::new(temp_dir.path());

	initialize(Some("conf"), None, 1).unwrap();
	assert_eq!(
		registry.search_path().unwrap().entries()[0].path,
		this_dir().join("conf").to_string_lossy()
	);

	let stack = CallStack::from_callers([cfgboot::caller_frame!()]);
	install_request(registry, &stack, &InitRequest::config_path(Some("conf"))).unwrap();
	assert_eq!(
		registry.search_path().unwrap().entries()[0].path,
		this_dir().join("conf").to_string_lossy()
	);
}

#[test]
#[serial]
fn test_initialize_twice_overwrites() {
	let registry = registry();
	initialize(Some("first"), Some("first"), 1).unwrap();
	initialize_config_module("my_app.conf", "second").unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "second");
	assert_eq!(state.search_path.len(), 2);
	assert_eq!(state.search_path.entries()[0].uri(), "pkg://my_app.conf");
	assert_eq!(state.caller.calling_module(), Some("my_app.conf.second"));
}

#[test]
#[serial]
fn test_initialize_config_dir_absolute() {
	let registry = registry();
	initialize_config_dir("/abs/dir", Some("x"), 1).unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "x");
	assert_eq!(state.search_path.entries()[0].path, "/abs/dir");
}

#[test]
#[serial]
fn test_initialize_config_dir_derives_job_name() {
	let registry = registry();
	initialize_config_dir("../conf", None, 1).unwrap();

	let state = registry.current().unwrap();
	assert_eq!(state.job_name, "init_test");
	let expected = Path::new(env!("CARGO_MANIFEST_DIR")).join("conf");
	assert_eq!(state.search_path.entries()[0].path, expected.to_string_lossy());
}

#[test]
#[serial]
fn test_scope_restores_absent() {
	let registry = registry();
	{
		let _scope = initialize_scoped(Some("conf"), None, 1).unwrap();
		assert!(registry.is_initialized());
	}
	assert!(!registry.is_initialized());
}

#[test]
#[serial]
fn test_scope_restores_absent_after_panic() {
	let registry = registry();

	let result = std::panic::catch_unwind(|| {
		let _scope = initialize_config_module_scoped("my_app.conf", "app").unwrap();
		panic!("scope body failed");
	});

	assert!(result.is_err());
	assert!(!registry.is_initialized());
}

#[test]
#[serial]
fn test_nested_scopes_restore_lifo() {
	let registry = registry();
	initialize_config_module("base.conf", "base").unwrap();
	let before = registry.current();

	{
		let _s1 = initialize_config_dir_scoped("/s1", Some("s1"), 1).unwrap();
		let s1_state = registry.current();

		{
			let _s2 = initialize_scoped(None, Some("s2"), 1).unwrap();
			assert_eq!(registry.job_name().as_deref(), Some("s2"));
		}

		assert_eq!(registry.current(), s1_state);
	}

	assert_eq!(registry.current(), before);
}

#[test]
#[serial]
fn test_failed_scope_does_not_mutate() {
	let registry = registry();
	initialize_config_module("base.conf", "base").unwrap();
	let before = registry.current();

	let result = initialize_config_module_scoped("not-a-module", "app");

	assert!(matches!(result, Err(InitError::InvalidModuleName { .. })));
	assert_eq!(registry.current(), before);
}

#[test]
#[serial]
fn test_with_scope_returns_body_result() {
	let registry = registry();
	let request = InitRequest::config_dir("/srv/conf").with_job_name("served");

	let job_name = with_scope(&request, || registry.job_name()).unwrap();

	assert_eq!(job_name.as_deref(), Some("served"));
	assert!(!registry.is_initialized());
}
