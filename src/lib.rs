//! cfgboot - bootstrap a process-wide configuration search path.
//!
//! This library provides:
//! - Caller detection (file, module, or interactive cell) and job-name derivation
//! - Config search path construction with user entries ahead of built-ins
//! - A global registry with snapshot/restore
//! - Initialization entry points and scoped guards that undo them
//!
//! # Example
//!
//! ```no_run
//! use cfgboot::init::{initialize_config_dir_scoped, initialize_config_module};
//! use cfgboot::registry::GlobalRegistry;
//!
//! initialize_config_module("my_app.conf", "app").unwrap();
//!
//! {
//!     let _scope = initialize_config_dir_scoped("/etc/my_app/conf", Some("job"), 1).unwrap();
//!     let search_path = GlobalRegistry::global().search_path().unwrap();
//!     println!("{search_path}");
//! }
//!
//! // Back to the module-based state
//! assert_eq!(GlobalRegistry::global().job_name().as_deref(), Some("app"));
//! ```

pub mod caller;
pub mod error;
pub mod init;
pub mod options;
pub mod registry;
pub mod search_path;

pub use error::{InitError, Result};
pub use init::{
	InitRequest, InitScope, initialize, initialize_config_dir, initialize_config_dir_scoped,
	initialize_config_module, initialize_config_module_scoped, initialize_scoped,
};
pub use registry::{GlobalRegistry, RegistryState};
