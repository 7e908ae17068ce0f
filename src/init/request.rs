use crate::caller::DEFAULT_JOB_NAME;

/// Where the user configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
	/// A path relative to the caller's directory, or an absolute path.
	/// `None` adds no user entries to the search path.
	Path(Option<String>),

	/// An importable config package, e.g. `my_app.conf`.
	Module(String),

	/// A filesystem directory, absolute or relative to the caller.
	Dir(String),
}

/// Everything an initialization call needs, validated once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitRequest {
	pub source: ConfigSource,

	/// Job name to install. `None` derives it from the caller.
	pub job_name: Option<String>,

	/// Deprecated strict-mode flag.
	pub strict: Option<bool>,

	/// Which frame to treat as the caller; 1 is the direct caller.
	pub caller_stack_depth: usize,
}

impl InitRequest {
	/// Caller-relative config path. The job name defaults to [`DEFAULT_JOB_NAME`].
	pub fn config_path(config_path: Option<&str>) -> Self {
		InitRequest {
			source: ConfigSource::Path(config_path.map(str::to_string)),
			job_name: Some(DEFAULT_JOB_NAME.to_string()),
			strict: None,
			caller_stack_depth: 1,
		}
	}

	/// Importable config package. The job name defaults to [`DEFAULT_JOB_NAME`].
	pub fn config_module(config_module: impl Into<String>) -> Self {
		InitRequest {
			source: ConfigSource::Module(config_module.into()),
			job_name: Some(DEFAULT_JOB_NAME.to_string()),
			strict: None,
			caller_stack_depth: 1,
		}
	}

	/// Filesystem config directory. The job name is derived from the caller.
	pub fn config_dir(config_dir: impl Into<String>) -> Self {
		InitRequest {
			source: ConfigSource::Dir(config_dir.into()),
			job_name: None,
			strict: None,
			caller_stack_depth: 1,
		}
	}

	pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
		self.job_name = Some(job_name.into());
		self
	}

	/// Derive the job name from the caller instead of using a fixed one.
	pub fn detect_job_name(mut self) -> Self {
		self.job_name = None;
		self
	}

	pub fn with_strict(mut self, strict: bool) -> Self {
		self.strict = Some(strict);
		self
	}

	pub fn with_caller_stack_depth(mut self, caller_stack_depth: usize) -> Self {
		self.caller_stack_depth = caller_stack_depth;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_job_name_defaults_per_source() {
		assert_eq!(InitRequest::config_path(None).job_name.as_deref(), Some("app"));
		assert_eq!(InitRequest::config_module("a.conf").job_name.as_deref(), Some("app"));
		assert_eq!(InitRequest::config_dir("/conf").job_name, None);
	}

	#[test]
	fn test_builder_overrides() {
		let request = InitRequest::config_path(Some("conf"))
			.detect_job_name()
			.with_strict(true)
			.with_caller_stack_depth(3);

		assert_eq!(request.source, ConfigSource::Path(Some("conf".to_string())));
		assert_eq!(request.job_name, None);
		assert_eq!(request.strict, Some(true));
		assert_eq!(request.caller_stack_depth, 3);

		let request = InitRequest::config_dir("conf").with_job_name("train");
		assert_eq!(request.job_name.as_deref(), Some("train"));
	}
}
