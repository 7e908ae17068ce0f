//! Initialization options files for cfgboot.
//!
//! This module handles:
//! - TOML options file parsing
//! - Validation of mutually exclusive config sources
//! - Conversion into an initialization request

pub mod parser;
pub mod template;
pub mod types;

pub use parser::{parse_options_file, parse_options_str};
pub use template::{OPTIONS_FILE_NAME, generate_options_template};
pub use types::{InitOptions, LoadedOptions};
