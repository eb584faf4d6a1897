//! Configuration loading and parsing for tfload.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Config merging

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, MergedConfig, ModuleRef};
