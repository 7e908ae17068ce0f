use crate::caller::{CallStack, CallerContext, DEFAULT_JOB_NAME, DetectCaller, detect_task_name};
use crate::error::Result;
use crate::init::request::{ConfigSource, InitRequest};
use crate::registry::{GlobalRegistry, RegistryState};
use crate::search_path::builder::resolve_config_dir;
use crate::search_path::{build_search_path, directory_search_path, module_search_path};
use std::path::Path;

/// Initialize the global registry with a config path relative to the caller.
///
/// `config_path` is resolved against the directory of the calling file. An
/// absolute path is used as-is. Passing `None` installs only the built-in
/// configuration.
///
/// `job_name` of `None` derives the name from the caller; pass
/// `Some(DEFAULT_JOB_NAME)` for the conventional `"app"`.
///
/// `caller_stack_depth` 1 is the direct caller, 2 its caller, and so on.
/// Frames past the direct caller, and the absolute path of the calling file,
/// come from debug info. Without it only depth 1 is available, and the calling
/// file is the compile-time relative path taken against the working directory.
/// Anchor explicitly with [`caller_frame!`](crate::caller_frame) and
/// [`install_request`] when that matters.
///
/// # Errors
///
/// - [`InitError::Detection`](crate::InitError::Detection) if `caller_stack_depth` has no frame
/// - [`InitError::UnsupportedCaller`](crate::InitError::UnsupportedCaller) for a relative path
///   from a module caller
#[track_caller]
pub fn initialize(
	config_path: Option<&str>,
	job_name: Option<&str>,
	caller_stack_depth: usize,
) -> Result<()> {
	let request = InitRequest {
		job_name: job_name.map(str::to_string),
		..InitRequest::config_path(config_path)
	}
	.with_caller_stack_depth(caller_stack_depth);
	initialize_from(&request)
}

/// Initialize the global registry with an importable config package.
///
/// `config_module` is an absolute dotted name such as `my_app.conf`. The caller
/// is not inspected.
#[track_caller]
pub fn initialize_config_module(config_module: &str, job_name: &str) -> Result<()> {
	let request = InitRequest::config_module(config_module).with_job_name(job_name);
	initialize_from(&request)
}

/// Initialize the global registry with a filesystem config directory.
///
/// Absolute directories work from any caller. Relative directories are
/// resolved against the calling file and rejected for module callers.
#[track_caller]
pub fn initialize_config_dir(
	config_dir: &str,
	job_name: Option<&str>,
	caller_stack_depth: usize,
) -> Result<()> {
	let request = InitRequest {
		job_name: job_name.map(str::to_string),
		..InitRequest::config_dir(config_dir)
	}
	.with_caller_stack_depth(caller_stack_depth);
	initialize_from(&request)
}

/// Run `request` against the global registry, detecting the caller from the call site.
#[track_caller]
pub fn initialize_from(request: &InitRequest) -> Result<()> {
	let stack = CallStack::capture();
	install_request(GlobalRegistry::global(), &stack, request)
}

/// Build the state for `request` and install it into `registry`.
///
/// Nothing is installed if building fails.
pub fn install_request(
	registry: &GlobalRegistry,
	detector: &impl DetectCaller,
	request: &InitRequest,
) -> Result<()> {
	let state = build_state(detector, request)?;
	registry.install(state);
	Ok(())
}

/// Build the registry state for `request` without installing it.
pub fn build_state(detector: &impl DetectCaller, request: &InitRequest) -> Result<RegistryState> {
	if let Some(strict) = request.strict {
		tracing::warn!(strict, "The strict flag is deprecated and has no effect on the search path");
	}

	match &request.source {
		ConfigSource::Path(config_path) => {
			let caller = detector.detect(request.caller_stack_depth)?;
			let job_name = resolve_job_name(request, &caller);
			let search_path = build_search_path(&caller, config_path.as_deref())?;

			Ok(RegistryState {
				search_path,
				job_name,
				strict: request.strict,
				caller,
			})
		}
		ConfigSource::Module(config_module) => {
			let job_name = request
				.job_name
				.clone()
				.unwrap_or_else(|| DEFAULT_JOB_NAME.to_string());
			let search_path = module_search_path(config_module)?;

			Ok(RegistryState {
				search_path,
				caller: CallerContext::Module(format!("{config_module}.{job_name}")),
				job_name,
				strict: request.strict,
			})
		}
		ConfigSource::Dir(config_dir) => {
			// Still detect for absolute dirs: the job name may come from the caller
			let caller = detector.detect(request.caller_stack_depth)?;
			let job_name = resolve_job_name(request, &caller);
			let search_path = if Path::new(config_dir).is_absolute() {
				directory_search_path(Path::new(config_dir))
			} else {
				let dir = resolve_config_dir(&caller, config_dir, "initialize_config_dir")?;
				directory_search_path(&dir)
			};

			Ok(RegistryState {
				search_path,
				job_name,
				strict: request.strict,
				caller,
			})
		}
	}
}

fn resolve_job_name(request: &InitRequest, caller: &CallerContext) -> String {
	request
		.job_name
		.clone()
		.unwrap_or_else(|| detect_task_name(caller))
}
