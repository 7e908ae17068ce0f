use crate::error::{InitError, Result};
use crate::options::types::{InitOptions, LoadedOptions};
use std::path::Path;

/// Parse an options file from the given path.
pub fn parse_options_file(path: &Path) -> Result<LoadedOptions> {
	let content = std::fs::read_to_string(path).map_err(|source| InitError::OptionsRead {
		path: path.to_path_buf(),
		source,
	})?;

	let options = parse_options_str(&content, path)?;
	Ok(LoadedOptions {
		options,
		path: path.to_path_buf(),
	})
}

/// Parse options from a string (useful for testing).
pub fn parse_options_str(content: &str, path: &Path) -> Result<InitOptions> {
	let options: InitOptions =
		toml::from_str(content).map_err(|source| InitError::OptionsParse {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed options
	options.validate()?;

	Ok(options)
}
