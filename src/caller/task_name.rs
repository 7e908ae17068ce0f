use crate::caller::detector::CallerContext;
use regex::Regex;
use std::sync::LazyLock;

/// Job name used when nothing better can be derived from the caller.
pub const DEFAULT_JOB_NAME: &str = "app";

static INVALID_NAME_CHARS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^-\w.]").expect("static regex should not panic"));

/// Derive a job name from the caller.
///
/// - File caller: the file stem (`/a/b/my_app.rs` -> `my_app`)
/// - Module caller: the last dotted component (`pkg.sub.runner` -> `runner`)
/// - Interactive caller: [`DEFAULT_JOB_NAME`]
pub fn detect_task_name(caller: &CallerContext) -> String {
	let name = match caller {
		CallerContext::File(path) => path
			.file_stem()
			.map(|stem| sanitize_name(&stem.to_string_lossy()))
			.unwrap_or_default(),
		CallerContext::Module(module) => module.rsplit('.').next().unwrap_or_default().to_string(),
		CallerContext::Interactive => String::new(),
	};

	if name.is_empty() {
		DEFAULT_JOB_NAME.to_string()
	} else {
		name
	}
}

/// Make a file stem safe to use as a job name.
///
/// Spaces become underscores and anything outside `[-\w.]` is dropped.
fn sanitize_name(stem: &str) -> String {
	let underscored = stem.trim().replace(' ', "_");
	INVALID_NAME_CHARS.replace_all(&underscored, "").into_owned()
}
