use crate::error::RelateError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Label used when a rule has no button label.
pub const DEFAULT_BUTTON_LABEL: &str = "Open related file";

/// Banner text used when a rule has no message.
pub const DEFAULT_MESSAGE: &str = "Related file available";

/// Top-level configuration from a `.relate.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.relate.toml.
	#[serde(default)]
	pub root: bool,

	/// If true, ignore every other config file, the user one included.
	#[serde(default)]
	pub no_external_lookup: bool,

	/// Environment variable name that, if truthy, skips ~/.relate.toml lookup.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// How a front end should surface related files.
	#[serde(default)]
	pub display_mode: DisplayMode,

	/// Relationship rules. Order is priority order.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// Presentation hint for front ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
	/// Show a banner with one link per related file.
	#[default]
	Banner,

	/// Show a single toolbar icon.
	Icon,
}

/// A rule mapping a source path to a related path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Rule {
	/// Stable identifier. Assigned by the rule store when left empty.
	pub id: String,

	/// Display name, not used for matching.
	pub name: String,

	/// Glob-like pattern: `*` matches within a segment, `**` across segments.
	pub source_pattern: String,

	/// Related path template, `$1`, `$2`, ... refer to the pattern's wildcards.
	pub target_template: String,

	/// Label for the link that opens the related file.
	pub button_label: String,

	/// Banner message. Blank means [`DEFAULT_MESSAGE`].
	pub message: String,
}

impl Default for Rule {
	fn default() -> Self {
		Rule {
			id: String::new(),
			name: String::new(),
			source_pattern: String::new(),
			target_template: String::new(),
			button_label: DEFAULT_BUTTON_LABEL.to_string(),
			message: String::new(),
		}
	}
}

impl Rule {
	/// A rule with a blank pattern or template never matches.
	pub fn is_usable(&self) -> bool {
		!self.source_pattern.trim().is_empty() && !self.target_template.trim().is_empty()
	}

	/// Button label, falling back to [`DEFAULT_BUTTON_LABEL`].
	pub fn label(&self) -> &str {
		non_blank_or(&self.button_label, DEFAULT_BUTTON_LABEL)
	}

	/// Banner message, falling back to [`DEFAULT_MESSAGE`].
	pub fn message_or_default(&self) -> &str {
		non_blank_or(&self.message, DEFAULT_MESSAGE)
	}

	/// Validate a rule at 1-based row `index`.
	pub fn validate(&self, index: usize) -> Result<(), RelateError> {
		if self.source_pattern.trim().is_empty() {
			return Err(RelateError::EmptyField {
				index,
				field: "source_pattern",
			});
		}
		if self.target_template.trim().is_empty() {
			return Err(RelateError::EmptyField {
				index,
				field: "target_template",
			});
		}
		Ok(())
	}
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
	if value.trim().is_empty() {
		fallback
	} else {
		value
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules from all configs, in cascade order (first match wins).
	pub rules: Vec<RuleWithSource>,

	/// Display mode of the most specific config.
	pub display_mode: DisplayMode,

	/// Whether external lookup is disabled (from any config in cascade).
	pub no_external_lookup: bool,
}

impl MergedConfig {
	/// The merged rules without their sources, in priority order.
	pub fn rules(&self) -> Vec<Rule> {
		self.rules.iter().map(|rws| rws.rule.clone()).collect()
	}
}

/// Merged rules together with the directory their paths are relative to.
#[derive(Debug, Clone)]
pub struct Project {
	/// Directory holding the outermost project config, or the start
	/// directory when no project config was found.
	pub root: PathBuf,

	/// The merged cascade.
	pub config: MergedConfig,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl Config {
	/// Validate all rules: non-empty pattern and template, unique explicit ids.
	pub fn validate(&self) -> Result<(), RelateError> {
		let mut ids = HashSet::new();
		for (i, rule) in self.rules.iter().enumerate() {
			rule.validate(i + 1)?;
			if !rule.id.is_empty() && !ids.insert(rule.id.as_str()) {
				return Err(RelateError::DuplicateRuleId {
					id: rule.id.clone(),
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_rule(source_pattern: &str, target_template: &str) -> Rule {
		Rule {
			source_pattern: source_pattern.to_string(),
			target_template: target_template.to_string(),
			..Default::default()
		}
	}

	#[test]
	fn test_rule_default_label() {
		let rule = Rule::default();
		assert_eq!(rule.button_label, DEFAULT_BUTTON_LABEL);
		assert_eq!(rule.message_or_default(), DEFAULT_MESSAGE);
	}

	#[test]
	fn test_blank_label_falls_back() {
		let rule = Rule {
			button_label: "  ".to_string(),
			message: "Docs".to_string(),
			..Default::default()
		};
		assert_eq!(rule.label(), DEFAULT_BUTTON_LABEL);
		assert_eq!(rule.message_or_default(), "Docs");
	}

	#[test]
	fn test_is_usable() {
		assert!(make_rule("a/*", "b/$1").is_usable());
		assert!(!make_rule("", "b/$1").is_usable());
		assert!(!make_rule("a/*", " ").is_usable());
	}

	#[test]
	fn test_validate_empty_fields() {
		let config = Config {
			rules: vec![make_rule("a/*", "b/$1"), make_rule("a/*", "")],
			..Default::default()
		};
		match config.validate().unwrap_err() {
			RelateError::EmptyField { index, field } => {
				assert_eq!(index, 2);
				assert_eq!(field, "target_template");
			}
			other => panic!("Expected EmptyField error, got {other:?}"),
		}
	}

	#[test]
	fn test_validate_duplicate_ids() {
		let mut first = make_rule("a/*", "b/$1");
		first.id = "same".to_string();
		let mut second = make_rule("c/*", "d/$1");
		second.id = "same".to_string();
		let config = Config {
			rules: vec![first, second],
			..Default::default()
		};
		match config.validate().unwrap_err() {
			RelateError::DuplicateRuleId { id } => assert_eq!(id, "same"),
			other => panic!("Expected DuplicateRuleId error, got {other:?}"),
		}
	}

	#[test]
	fn test_validate_allows_missing_ids() {
		let config = Config {
			rules: vec![make_rule("a/*", "b/$1"), make_rule("c/*", "d/$1")],
			..Default::default()
		};
		assert!(config.validate().is_ok());
	}
}
