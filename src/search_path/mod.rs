//! Config search path construction for cfgboot.
//!
//! This module handles:
//! - Resolving caller-relative and absolute config directories
//! - Addressing importable config packages
//! - Ordering user entries ahead of the built-in configuration

pub mod builder;
pub mod types;

pub use builder::{
	BUILTIN_CONFIG_MODULE, BUILTIN_PROVIDER, USER_PROVIDER, build_search_path,
	directory_search_path, module_search_path, normalize_path,
};
pub use types::{ConfigSearchPath, Schema, SearchPathEntry, SearchPathQuery};
