use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig};
use crate::error::{LoaderError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of the tool configuration.
pub const CONFIG_FILE_NAME: &str = ".tfload.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.tfload.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.tfload.toml (unless a config sets `no-user-config`)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.tfload.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	if existing_configs.iter().any(|l| l.config.no_user_config) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	// Already picked up while walking up from inside the home directory
	if existing_configs.iter().any(|l| l.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single effective config.
///
/// Var files are ordered least specific first so that project files override
/// user files. The first module seen for a key wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();
	let mut seen_modules = HashSet::new();

	for loaded in configs {
		if loaded.config.debug {
			merged.debug = true;
		}

		for module in &loaded.config.modules {
			if seen_modules.insert(module.key.clone()) {
				merged.modules.push(module.clone());
			}
		}
	}

	for loaded in configs.iter().rev() {
		let base = loaded.path.parent().unwrap_or(Path::new(""));
		for var_file in &loaded.config.var_files {
			merged.var_files.push(base.join(var_file));
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(LoaderError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{Config, ModuleRef};

	fn loaded(path: &str, config: Config) -> LoadedConfig {
		LoadedConfig {
			config,
			path: PathBuf::from(path),
		}
	}

	fn module(key: &str, source: &str) -> ModuleRef {
		ModuleRef {
			key: key.to_string(),
			source: source.to_string(),
		}
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path().unwrap();
		assert!(path.ends_with(".tfload.toml"));
	}

	#[test]
	fn test_merge_var_files_least_specific_first() {
		let project = loaded(
			"/work/infra/.tfload.toml",
			Config {
				var_files: vec![PathBuf::from("prod.tfvars")],
				..Default::default()
			},
		);
		let user = loaded(
			"/home/me/.tfload.toml",
			Config {
				var_files: vec![PathBuf::from("common.tfvars")],
				..Default::default()
			},
		);

		let merged = merge_configs(&[project, user]);
		assert_eq!(
			merged.var_files,
			vec![
				PathBuf::from("/home/me/common.tfvars"),
				PathBuf::from("/work/infra/prod.tfvars"),
			]
		);
	}

	#[test]
	fn test_merge_modules_most_specific_wins() {
		let project = loaded(
			"/work/.tfload.toml",
			Config {
				modules: vec![module("abc", "./modules/local")],
				..Default::default()
			},
		);
		let user = loaded(
			"/home/me/.tfload.toml",
			Config {
				modules: vec![module("abc", "git::other"), module("def", "git::def")],
				..Default::default()
			},
		);

		let merged = merge_configs(&[project, user]);
		assert_eq!(
			merged.modules,
			vec![module("abc", "./modules/local"), module("def", "git::def")]
		);
	}

	#[test]
	fn test_merge_debug_any() {
		let quiet = loaded("/a/.tfload.toml", Config::default());
		let loud = loaded(
			"/.tfload.toml",
			Config {
				debug: true,
				..Default::default()
			},
		);
		assert!(merge_configs(&[quiet, loud]).debug);
		assert!(!merge_configs(&[]).debug);
	}

	#[test]
	fn test_discover_stops_at_root() {
		let temp_dir = tempfile::tempdir().unwrap();
		let inner = temp_dir.path().join("inner");
		std::fs::create_dir(&inner).unwrap();
		std::fs::write(
			temp_dir.path().join(CONFIG_FILE_NAME),
			"var-files = [\"outer.tfvars\"]\n",
		)
		.unwrap();
		std::fs::write(
			inner.join(CONFIG_FILE_NAME),
			"root = true\nno-user-config = true\n",
		)
		.unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert_eq!(configs.len(), 1);
		assert_eq!(configs[0].path, inner.join(CONFIG_FILE_NAME));
	}
}
