//! Caller context detection for cfgboot.
//!
//! This module handles:
//! - Classifying the caller as a file, a module, or an interactive cell
//! - Deriving a default job name from the caller

pub mod detector;
pub mod task_name;

pub use detector::{CallStack, CallerContext, DetectCaller, Frame};
pub use task_name::{DEFAULT_JOB_NAME, detect_task_name};

/// Build a [`Frame`] for the current source location.
///
/// The file is anchored at the calling crate's manifest directory, so the
/// result does not depend on the working directory at runtime.
///
/// ```no_run
/// use cfgboot::caller::CallStack;
/// use cfgboot::init::{InitRequest, install_request};
/// use cfgboot::registry::GlobalRegistry;
///
/// let stack = CallStack::from_callers([cfgboot::caller_frame!()]);
/// install_request(GlobalRegistry::global(), &stack, &InitRequest::config_path(Some("conf"))).unwrap();
/// ```
#[macro_export]
macro_rules! caller_frame {
	() => {
		$crate::caller::Frame::from_source(env!("CARGO_MANIFEST_DIR"), file!(), module_path!())
	};
}
