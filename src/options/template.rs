/// Default file name for initialization options.
pub const OPTIONS_FILE_NAME: &str = "cfgboot.toml";

/// Generate a starter options file.
pub fn generate_options_template() -> String {
	r#"# cfgboot initialization options
#
# Set at most one of config-path, config-dir and config-module.

# Config directory relative to this file (or absolute)
config-path = "conf"

# Filesystem directory, relative to this file or absolute
# config-dir = "/etc/my_app/conf"

# Importable config package
# config-module = "my_app.conf"

# Job name; derived from the caller when absent: this file's name
# without extension, or "app" with config-module
# job-name = "my_app"

# Which frame counts as the caller; 1 is this file
# caller-stack-depth = 1
"#
	.to_string()
}
