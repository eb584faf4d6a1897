use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tfload::config::{CONFIG_FILE_NAME, ModuleRef, load_merged_config, user_config_path};
use tfload::diagnostics::init_tracing;
use tfload::loader::{Loader, Snapshot};

#[derive(Parser)]
#[command(name = "tfload")]
#[command(
	author,
	version,
	about = "Load Terraform templates, modules, state and variable files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .tfload.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .tfload.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Enable debug diagnostics on stderr
	#[arg(long, global = true)]
	debug: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Load a configuration directory and print what was found
	Load {
		/// Directory holding the root *.tf files
		#[arg(default_value = ".")]
		dir: PathBuf,

		/// Variable file to load after the configured ones (repeatable)
		#[arg(long = "var-file", value_name = "FILE")]
		var_files: Vec<PathBuf>,

		/// Vendored module to load, as KEY=SOURCE (repeatable)
		#[arg(long = "module", value_name = "KEY=SOURCE", value_parser = parse_module)]
		modules: Vec<ModuleRef>,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration files in cascade order
	Show,
	/// Check all config files for errors without loading anything
	Validate,
}

fn parse_module(value: &str) -> std::result::Result<ModuleRef, String> {
	ModuleRef::parse_pair(value).ok_or_else(|| format!("expected KEY=SOURCE, got `{}`", value))
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Load {
				dir,
				var_files,
				modules,
			} => handle_load(&dir, &var_files, &modules, cli.debug),
			Commands::Config { action } => {
				init_tracing(cli.debug);
				match action {
					ConfigAction::Show => handle_config_show(),
					ConfigAction::Validate => handle_config_validate(),
				}
			}
		};
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {}", CONFIG_FILE_NAME);
	Ok(ExitCode::SUCCESS)
}

const INIT_TEMPLATE: &str = r#"# tfload configuration
#
# Stop looking for .tfload.toml in parent directories.
root = true

# Variable files, lowest precedence first.
var-files = ["terraform.tfvars"]

# Modules fetched by `terraform get`, keyed by their .terraform/modules directory.
# [[modules]]
# key = "1-vpc"
# source = "./modules/vpc"
"#;

fn handle_load(
	dir: &Path,
	var_files: &[PathBuf],
	modules: &[ModuleRef],
	debug: bool,
) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_merged_config(&cwd).context("Failed to load configuration")?;
	init_tracing(debug || config.debug);

	let mut loader = Loader::with_tracing(&cwd);

	loader
		.load_all_template(dir)
		.with_context(|| format!("Failed to load templates from {}", dir.display()))?;

	for module in config.modules.iter().chain(modules) {
		loader
			.load_module_file(&module.key, &module.source)
			.with_context(|| format!("Failed to load module {}", module.key))?;
	}

	loader.load_state();
	loader.load_tfvars(config.var_files.iter().chain(var_files));

	print_snapshot(&loader.dump());
	Ok(ExitCode::SUCCESS)
}

fn print_snapshot(snapshot: &Snapshot) {
	println!("Templates ({}):", snapshot.templates.len());
	for key in snapshot.templates.keys() {
		let size = snapshot.files.get(key).map(Vec::len).unwrap_or(0);
		println!("  {} ({} bytes)", key, size);
	}

	if snapshot.state.is_empty() {
		println!("State: none");
	} else {
		println!(
			"State: version {}, serial {}, {} resources",
			snapshot.state.version,
			snapshot.state.serial,
			snapshot.state.resource_count()
		);
	}

	println!("Variable files: {}", snapshot.tf_vars.len());
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs =
		tfload::config::discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# no-user-config: {}", loaded.config.no_user_config);
		println!("# debug: {}", loaded.config.debug);
		for var_file in &loaded.config.var_files {
			println!("  var-file: {}", var_file.display());
		}
		for module in &loaded.config.modules {
			println!("  module: {} = {}", module.key, module.source);
		}
		println!();
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

	match tfload::config::discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} var files, {} modules)",
						loaded.path.display(),
						loaded.config.var_files.len(),
						loaded.config.modules.len()
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
