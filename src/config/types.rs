use crate::error::LoaderError;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.tfload.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade at this file.
	#[serde(default)]
	pub root: bool,

	/// If true, ~/.tfload.toml is not consulted.
	#[serde(default)]
	pub no_user_config: bool,

	/// Enable debug-level diagnostics.
	#[serde(default)]
	pub debug: bool,

	/// Variable files to load, in precedence order (last wins).
	#[serde(default)]
	pub var_files: Vec<PathBuf>,

	/// Modules vendored under `.terraform/modules` to load with the templates.
	#[serde(default)]
	pub modules: Vec<ModuleRef>,
}

/// A module to load: its cache directory name and its source address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleRef {
	/// Directory name under `.terraform/modules`.
	pub key: String,

	/// Source address, used as the key namespace for the module's files.
	pub source: String,
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
	/// Whether any config enabled debug diagnostics.
	pub debug: bool,

	/// Variable files, least specific config first.
	pub var_files: Vec<PathBuf>,

	/// Modules, most specific config first, one per key.
	pub modules: Vec<ModuleRef>,
}

impl ModuleRef {
	/// Parse a `KEY=SOURCE` pair as given on the command line.
	pub fn parse_pair(pair: &str) -> Option<Self> {
		let (key, source) = pair.split_once('=')?;
		let module = ModuleRef {
			key: key.trim().to_string(),
			source: source.trim().to_string(),
		};
		(!module.key.is_empty() && !module.source.is_empty()).then_some(module)
	}
}

impl Config {
	/// Validate all module references in this config.
	pub fn validate(&self, path: &std::path::Path) -> Result<(), LoaderError> {
		for module in &self.modules {
			if module.key.trim().is_empty() {
				return Err(LoaderError::InvalidModule {
					path: path.to_path_buf(),
					reason: format!("module with source `{}` has an empty key", module.source),
				});
			}
			if module.source.trim().is_empty() {
				return Err(LoaderError::InvalidModule {
					path: path.to_path_buf(),
					reason: format!("module `{}` has an empty source", module.key),
				});
			}
		}
		Ok(())
	}
}
