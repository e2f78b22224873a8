use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, Project, RuleWithSource};
use crate::error::{RelateError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".relate.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.relate.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.relate.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let user_config = user_config_path()?;
	discover_configs_with_user(start_dir, &user_config)
}

/// Same as [`discover_configs`] with an explicit user config location.
pub fn discover_configs_with_user(
	start_dir: &Path,
	user_config: &Path,
) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		// The user config is appended last, never mid-walk.
		if config_path.exists() && config_path != user_config {
			let config = parse_config_file(&config_path)?;
			tracing::debug!(path = %config_path.display(), "loaded config");

			if config.no_external_lookup {
				configs.push(LoadedConfig {
					config,
					path: config_path,
				});
				return Ok(configs);
			}

			let stop = config.root;
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if stop {
				break;
			}
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user) = load_user_config(&configs, user_config)? {
		configs.push(user);
	}

	Ok(configs)
}

/// Load the user config if it exists and isn't disabled.
fn load_user_config(
	existing_configs: &[LoadedConfig],
	user_config_path: &Path,
) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			tracing::debug!(%env_var, "user config lookup disabled");
			return Ok(None);
		}
	}

	if user_config_path.exists() {
		let config = parse_config_file(user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path.to_path_buf(),
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Rules are collected in cascade order, so rules from the most specific
/// file take priority. The display mode comes from the most specific file.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	if let Some(first) = configs.first() {
		merged.display_mode = first.config.display_mode;
	}

	for loaded in configs {
		for rule in &loaded.config.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}

		if loaded.config.no_external_lookup {
			merged.no_external_lookup = true;
		}
	}

	merged
}

/// Directory the rule paths of a cascade are relative to.
///
/// That is the directory of the first config that ends the walk (`root` or
/// `no-external-lookup`), else the directory of the outermost project
/// config. The user config never decides the root.
pub fn project_root(configs: &[LoadedConfig], user_config: &Path) -> Option<PathBuf> {
	let mut project = configs.iter().filter(|loaded| loaded.path != user_config);
	let stop = project
		.clone()
		.find(|loaded| loaded.config.root || loaded.config.no_external_lookup);
	stop.or_else(|| project.next_back())
		.and_then(|loaded| loaded.path.parent())
		.map(Path::to_path_buf)
}

/// Discover, load and merge configs from a directory and locate the project
/// root. Falls back to `start_dir` when no project config exists.
pub fn load_project(start_dir: &Path) -> Result<Project> {
	let user_config = user_config_path()?;
	load_project_with_user(start_dir, &user_config)
}

/// Same as [`load_project`] with an explicit user config location.
pub fn load_project_with_user(start_dir: &Path, user_config: &Path) -> Result<Project> {
	let configs = discover_configs_with_user(start_dir, user_config)?;
	let root = project_root(&configs, user_config).unwrap_or_else(|| start_dir.to_path_buf());
	tracing::debug!(root = %root.display(), configs = configs.len(), "project loaded");
	Ok(Project {
		root,
		config: merge_configs(&configs),
	})
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RelateError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
