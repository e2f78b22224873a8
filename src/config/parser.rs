use crate::config::types::Config;
use crate::error::{RelateError, Result};
use std::path::Path;

/// Starting `.relate.toml` written by `relate init`.
pub const INIT_TEMPLATE: &str = r#"# relate configuration
#
# Rules map a source file to related files. Paths are relative to the
# project root, the directory of the .relate.toml with root = true (this
# file), and always use forward slashes.
#
# source_pattern wildcards, each one a numbered capture:
#   *   one or more characters within a single path segment
#   **  any characters, including '/'
# Everything else is literal: "(js|ts)" and "{js,ts}" are not alternation.
#
# target_template refers to captures as $1, $2, ... from left to right.

# Stop looking for .relate.toml in parent directories.
root = true

# "banner" lists every related file, "icon" shows a single toolbar action.
display-mode = "banner"

[[rules]]
name = "Rule 1"
source_pattern = "src/**/*.rs"
target_template = "tests/$1/$2_test.rs"
button_label = "Open test"
message = "Test file available"
"#;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| RelateError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| RelateError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;
	tracing::debug!(path = %path.display(), rules = config.rules.len(), "parsed config");

	Ok(config)
}
