use std::path::PathBuf;

/// Library-level structured errors for cfgboot.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
	#[error("No caller frame at stack depth {depth} (call stack has {available} frames)")]
	Detection { depth: usize, available: usize },

	#[error(
		"{operation} does not support a module caller ({module}) with a relative config path: {path}"
	)]
	UnsupportedCaller {
		operation: &'static str,
		module: String,
		path: String,
	},

	#[error("Invalid config module name: {module:?}")]
	InvalidModuleName { module: String },

	#[error("Failed to resolve current directory")]
	CurrentDir {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read options file: {path}")]
	OptionsRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse options file: {path}")]
	OptionsParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },
}

/// Result type alias using InitError.
pub type Result<T> = std::result::Result<T, InitError>;
