use crate::caller::CallerContext;
use crate::error::{InitError, Result};
use crate::search_path::types::{ConfigSearchPath, Schema, SearchPathEntry};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Provider tag for user-supplied entries.
pub const USER_PROVIDER: &str = "main";

/// Provider tag for the built-in configuration entry.
pub const BUILTIN_PROVIDER: &str = "cfgboot";

/// Package holding the built-in configuration.
pub const BUILTIN_CONFIG_MODULE: &str = "cfgboot.conf";

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
		.expect("static regex should not panic")
});

/// Build the search path for a caller-relative (or absolute) config path.
///
/// The resulting order is:
/// 1. The resolved `specifier`, if one was given
/// 2. The built-in configuration
pub fn build_search_path(
	caller: &CallerContext,
	specifier: Option<&str>,
) -> Result<ConfigSearchPath> {
	let mut search_path = ConfigSearchPath::new();

	if let Some(specifier) = specifier {
		let dir = resolve_config_dir(caller, specifier, "initialize")?;
		search_path.append(filesystem_entry(&dir));
	}

	append_builtin(&mut search_path);
	tracing::debug!(caller = %caller, entries = search_path.len(), "Built config search path");
	Ok(search_path)
}

/// Build the search path for an importable config package, e.g. `my_app.conf`.
///
/// Whether the package actually exists is left to the resolution engine.
pub fn module_search_path(config_module: &str) -> Result<ConfigSearchPath> {
	validate_module_name(config_module)?;

	let mut search_path = ConfigSearchPath::new();
	search_path.append(SearchPathEntry::new(
		USER_PROVIDER,
		config_module,
		Schema::PackageResource,
	));
	append_builtin(&mut search_path);
	Ok(search_path)
}

/// Build a standalone search path for a filesystem directory.
pub fn directory_search_path(config_dir: &Path) -> ConfigSearchPath {
	let mut search_path = ConfigSearchPath::new();
	search_path.append(filesystem_entry(&normalize_path(config_dir)));
	append_builtin(&mut search_path);
	search_path
}

/// Resolve `specifier` to a directory.
///
/// Absolute paths are taken as-is. Relative paths are anchored at the calling
/// file's directory, or at the working directory for interactive callers.
/// Module callers have no anchor directory and are rejected.
pub(crate) fn resolve_config_dir(
	caller: &CallerContext,
	specifier: &str,
	operation: &'static str,
) -> Result<PathBuf> {
	let path = Path::new(specifier);
	if path.is_absolute() {
		return Ok(normalize_path(path));
	}

	let base = match caller {
		CallerContext::File(file) => file.parent().map(Path::to_path_buf).unwrap_or_default(),
		CallerContext::Module(module) => {
			return Err(InitError::UnsupportedCaller {
				operation,
				module: module.clone(),
				path: specifier.to_string(),
			});
		}
		CallerContext::Interactive => {
			std::env::current_dir().map_err(|source| InitError::CurrentDir { source })?
		}
	};

	Ok(normalize_path(&base.join(path)))
}

/// Check that `module` is a dotted identifier path.
pub fn validate_module_name(module: &str) -> Result<()> {
	if MODULE_NAME.is_match(module) {
		Ok(())
	} else {
		Err(InitError::InvalidModuleName {
			module: module.to_string(),
		})
	}
}

/// Lexically normalize a path, folding `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => match normalized.components().next_back() {
				Some(Component::Normal(_)) => {
					normalized.pop();
				}
				// Cannot climb above the root
				Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
				_ => normalized.push(".."),
			},
			other => normalized.push(other.as_os_str()),
		}
	}

	if normalized.as_os_str().is_empty() {
		normalized.push(".");
	}
	normalized
}

fn filesystem_entry(dir: &Path) -> SearchPathEntry {
	SearchPathEntry::new(
		USER_PROVIDER,
		dir.to_string_lossy().into_owned(),
		Schema::FileSystem,
	)
}

fn append_builtin(search_path: &mut ConfigSearchPath) {
	search_path.append(SearchPathEntry::new(
		BUILTIN_PROVIDER,
		BUILTIN_CONFIG_MODULE,
		Schema::PackageResource,
	));
}
