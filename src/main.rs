use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use relate_cli::config::{
	CONFIG_FILE_NAME, DisplayMode, INIT_TEMPLATE, RuleStore, discover_configs, load_project,
	user_config_path,
};
use relate_cli::links::{
	RelatedLink, absolute_path, action_label, banner_text, links, open_all_label, relative_to,
};
use relate_cli::rules::flip_glob_and_template;

#[derive(Parser)]
#[command(name = "relate")]
#[command(
	author,
	version,
	about = "Find the files related to a source file using glob to template rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Log rule compilation and matching to stderr
	#[arg(long, short, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the files related to PATH
	Resolve {
		/// Source file, absolute or relative to the current directory
		path: PathBuf,

		/// Print every related file instead of the first one
		#[arg(long)]
		all: bool,

		/// Only print related files that exist on disk
		#[arg(long)]
		existing: bool,

		/// Directory rule paths are relative to (defaults to the directory of
		/// the root .relate.toml, else the outermost one found)
		#[arg(long, value_name = "DIR")]
		project_root: Option<PathBuf>,
	},

	/// Create a template .relate.toml in the current directory
	Init {
		/// Overwrite an existing .relate.toml
		#[arg(long)]
		force: bool,
	},

	/// Swap a source pattern and target template
	Flip {
		/// Source pattern, such as src/**/*.cs
		glob: String,

		/// Target template, such as xml/$1/$2.xml
		template: String,
	},

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display every config file in cascade order with its rules
	Show,
	/// Check all config files for errors without resolving anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	match cli.command {
		Commands::Resolve {
			path,
			all,
			existing,
			project_root,
		} => handle_resolve(&path, all, existing, project_root),
		Commands::Init { force } => handle_init(force),
		Commands::Flip { glob, template } => handle_flip(&glob, &template),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn handle_resolve(
	path: &Path,
	all: bool,
	existing: bool,
	project_root: Option<PathBuf>,
) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let source = cwd.join(path);

	let project = match project_root {
		Some(dir) => {
			let root = dir
				.canonicalize()
				.or_else(|_| std::path::absolute(&dir))
				.with_context(|| format!("Failed to resolve {}", dir.display()))?;
			let mut project = load_project(&root).context("Failed to load configuration")?;
			project.root = root;
			project
		}
		None => load_project(&cwd).context("Failed to load configuration")?,
	};
	let root = project.root;

	let relative = relative_to(&root, &source)
		.or_else(|| relative_to(&root.canonicalize().ok()?, &source.canonicalize().ok()?))
		.ok_or_else(|| {
			anyhow::anyhow!(
				"{} is not inside project root {}",
				path.display(),
				root.display()
			)
		})?;

	let store = RuleStore::from_merged(&project.config);
	let results = store.resolve_all(&relative);

	let mut found = links(&results);
	if existing {
		found.retain(|link| absolute_path(&root, &link.related_path).exists());
	}

	if found.is_empty() {
		eprintln!("No related files for {}", relative);
		return Ok(ExitCode::FAILURE);
	}

	if all {
		print_links(&found, project.config.display_mode);
	} else {
		print_link(&found[0]);
	}

	Ok(ExitCode::SUCCESS)
}

/// Print every link framed the way the display mode presents it: a banner
/// with one link each plus an open-all link, or a single counted action.
fn print_links(found: &[RelatedLink], mode: DisplayMode) {
	match mode {
		DisplayMode::Banner => {
			if let Some(text) = banner_text(found) {
				println!("# {text}");
			}
			for link in found {
				print_link(link);
			}
			if found.len() > 1 {
				println!("# {}", open_all_label(found.len()));
			}
		}
		DisplayMode::Icon => {
			if let Some(label) = action_label(found) {
				println!("# {label}");
			}
			for link in found {
				print_link(link);
			}
		}
	}
}

fn print_link(link: &RelatedLink) {
	println!("{}\t{}", link.related_path, link.label);
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_flip(glob: &str, template: &str) -> Result<ExitCode> {
	let (new_glob, new_template) = flip_glob_and_template(glob, template);
	println!("source_pattern = {new_glob}");
	println!("target_template = {new_template}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# no-external-lookup: {}", loaded.config.no_external_lookup);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		println!("# display-mode: {:?}", loaded.config.display_mode);
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for (i, rule) in loaded.config.rules.iter().enumerate() {
			println!("  Rule {}:", i + 1);
			if !rule.id.is_empty() {
				println!("    id: {}", rule.id);
			}
			if !rule.name.is_empty() {
				println!("    name: {}", rule.name);
			}
			println!("    source_pattern: {}", rule.source_pattern);
			println!("    target_template: {}", rule.target_template);
			println!("    button_label: {}", rule.label());
			println!("    message: {}", rule.message_or_default());
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} rules)",
						loaded.path.display(),
						loaded.config.rules.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
