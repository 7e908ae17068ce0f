use crate::caller::{CallStack, Frame};
use crate::error::InitError;
use crate::init::InitRequest;
use serde::Deserialize;
use std::path::PathBuf;

/// Initialization options from a `cfgboot.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InitOptions {
	/// Config path relative to the options file, or absolute.
	/// Mutually exclusive with config_dir and config_module.
	pub config_path: Option<String>,

	/// Filesystem config directory, relative to the options file or absolute.
	/// Mutually exclusive with config_path and config_module.
	pub config_dir: Option<String>,

	/// Importable config package, e.g. "my_app.conf".
	/// Mutually exclusive with config_path and config_dir.
	pub config_module: Option<String>,

	/// Job name. Derived from the caller when absent: the options file name,
	/// or "app" for config-module.
	pub job_name: Option<String>,

	/// Deprecated strict-mode flag.
	pub strict: Option<bool>,

	/// Which frame counts as the caller. Defaults to 1, the options file itself.
	pub caller_stack_depth: Option<usize>,
}

/// Options together with the file they were loaded from.
#[derive(Debug, Clone)]
pub struct LoadedOptions {
	/// The parsed options.
	pub options: InitOptions,

	/// The path the options were loaded from.
	pub path: PathBuf,
}

impl InitOptions {
	/// Validate that at most one config source is set.
	pub fn validate(&self) -> Result<(), InitError> {
		let source_fields = [
			("config-path", self.config_path.is_some()),
			("config-dir", self.config_dir.is_some()),
			("config-module", self.config_module.is_some()),
		];

		let set_fields: Vec<_> = source_fields
			.iter()
			.filter(|(_, is_set)| *is_set)
			.map(|(name, _)| *name)
			.collect();

		if set_fields.len() > 1 {
			return Err(InitError::MutuallyExclusive {
				option1: set_fields[0].to_string(),
				option2: set_fields[1].to_string(),
			});
		}

		Ok(())
	}

	/// Turn the options into a request. An absent job name is derived from the caller.
	pub fn to_request(&self) -> InitRequest {
		let request = if let Some(ref module) = self.config_module {
			InitRequest::config_module(module.as_str())
		} else if let Some(ref dir) = self.config_dir {
			InitRequest::config_dir(dir.as_str())
		} else {
			InitRequest::config_path(self.config_path.as_deref())
		};

		let request = match self.job_name {
			Some(ref job_name) => request.with_job_name(job_name.as_str()),
			None => request.detect_job_name(),
		};

		let request = match self.strict {
			Some(strict) => request.with_strict(strict),
			None => request,
		};

		match self.caller_stack_depth {
			Some(depth) => request.with_caller_stack_depth(depth),
			None => request,
		}
	}
}

impl LoadedOptions {
	/// The options file acts as the calling file: relative paths are anchored
	/// next to it and the job name defaults to its stem.
	pub fn caller_stack(&self) -> CallStack {
		CallStack::from_callers([Frame::file(&self.path)])
	}
}
