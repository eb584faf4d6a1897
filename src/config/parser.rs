use crate::config::types::Config;
use crate::error::{LoaderError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| LoaderError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config = toml::from_str(content).map_err(|source| LoaderError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})?;

	config.validate(path)?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let content = "";
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(!config.root);
		assert!(!config.no_user_config);
		assert!(!config.debug);
		assert!(config.var_files.is_empty());
		assert!(config.modules.is_empty());
	}

	#[test]
	fn test_parse_basic_config() {
		let content = r#"
root = true
no-user-config = true
debug = true
var-files = ["terraform.tfvars", "prod.tfvars.json"]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert!(config.no_user_config);
		assert!(config.debug);
		assert_eq!(
			config.var_files,
			vec![
				PathBuf::from("terraform.tfvars"),
				PathBuf::from("prod.tfvars.json")
			]
		);
	}

	#[test]
	fn test_parse_modules_array_of_tables() {
		let content = r#"
[[modules]]
key = "1-vpc"
source = "./modules/vpc"

[[modules]]
key = "abc123"
source = "git::https://example/mod"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.modules.len(), 2);
		assert_eq!(config.modules[0].key, "1-vpc");
		assert_eq!(config.modules[1].source, "git::https://example/mod");
	}

	#[test]
	fn test_module_with_empty_source_is_rejected() {
		let content = r#"
[[modules]]
key = "abc123"
source = ""
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			LoaderError::InvalidModule { reason, .. } => {
				assert!(reason.contains("abc123"));
			}
			_ => panic!("Expected InvalidModule error"),
		}
	}

	#[test]
	fn test_invalid_toml() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("var-files = [[[", &path);
		assert!(matches!(result, Err(LoaderError::ConfigParse { .. })));
	}
}
