//! Configuration loading and rule storage for relate.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Directory cascade discovery
//! - Config merging
//! - The rule store that owns the compiled-rule cache

pub mod cascade;
pub mod parser;
pub mod store;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, discover_configs_with_user, load_project,
	load_project_with_user, merge_configs, project_root, user_config_path,
};
pub use parser::{INIT_TEMPLATE, parse_config_file, parse_config_str};
pub use store::RuleStore;
pub use types::{Config, DisplayMode, LoadedConfig, MergedConfig, Project, Rule, RuleWithSource};
