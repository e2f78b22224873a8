use std::path::PathBuf;

/// Library-level structured errors for relate.
///
/// Only the settings layer can fail. Compiling and resolving rules is total,
/// so nothing under `rules` produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum RelateError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Row {index}: '{field}' must not be empty")]
	EmptyField { index: usize, field: &'static str },

	#[error("Duplicate rule id: {id}")]
	DuplicateRuleId { id: String },

	#[error("No rule with id: {id}")]
	RuleNotFound { id: String },

	#[error("Position {index} is out of range for {len} rules")]
	InvalidPosition { index: usize, len: usize },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RelateError.
pub type Result<T> = std::result::Result<T, RelateError>;
