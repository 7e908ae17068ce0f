//! Helpers that initialize on behalf of the test calling them.

use cfgboot::{Result, initialize};

/// Initialize with the config path anchored at this helper's caller.
pub fn initialize_for_caller(config_path: &str) -> Result<()> {
	initialize(Some(config_path), None, 2)
}

/// Initialize with the config path anchored at this file.
pub fn initialize_here(config_path: &str) -> Result<()> {
	initialize(Some(config_path), None, 1)
}
