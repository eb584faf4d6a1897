use crate::syntax::ParseFailure;
use std::path::PathBuf;

/// Library-level structured errors for tfload.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
	#[error("Invalid glob pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: glob::PatternError,
	},

	#[error("Cannot open file {path}")]
	CannotOpenFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Parse error occurred by {path}")]
	Parse {
		path: PathBuf,
		#[source]
		source: ParseFailure,
	},

	#[error("Directory not accessible: {path}")]
	DirectoryUnavailable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("module `{source_id}` not found. Did you run `terraform get`?")]
	ModuleNotFound {
		source_id: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid module reference in {path}: {reason}")]
	InvalidModule { path: PathBuf, reason: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using LoaderError.
pub type Result<T> = std::result::Result<T, LoaderError>;
