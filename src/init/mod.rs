//! Initialization entry points for cfgboot.
//!
//! This module handles:
//! - Detecting the caller and deriving a job name
//! - Building the search path for each kind of config source
//! - Installing the result into the global registry
//! - Scoped variants that restore the registry when the scope ends

pub mod api;
pub mod request;
pub mod scoped;

pub use api::{
	build_state, initialize, initialize_config_dir, initialize_config_module, initialize_from,
	install_request,
};
pub use request::{ConfigSource, InitRequest};
pub use scoped::{
	InitScope, initialize_config_dir_scoped, initialize_config_module_scoped, initialize_scoped,
	scoped_from, with_scope,
};
