use super::Loader;
use super::store::{module_key, normalize_key};
use crate::error::{LoaderError, Result};
use crate::syntax::{HclSyntax, SyntaxParser};
use std::path::{Path, PathBuf};

/// Directory, relative to the working directory, where `terraform get` vendors modules.
pub const MODULE_CACHE_DIR: &str = ".terraform/modules";

/// Extension of primary configuration files.
pub const TEMPLATE_EXTENSION: &str = "tf";

impl Loader {
	/// Load every file matching a glob pattern.
	///
	/// Relative patterns are matched against the working directory and keyed
	/// relative to it. A pattern matching nothing is not an error.
	///
	/// The first unreadable or unparsable file aborts the call. Files loaded
	/// before it stay in the store.
	pub fn load_template(&mut self, pattern: &str) -> Result<()> {
		let relative = !Path::new(pattern).is_absolute();
		let full_pattern = if relative {
			format!(
				"{}/{}",
				glob::Pattern::escape(&self.working_dir.to_string_lossy()),
				pattern
			)
		} else {
			pattern.to_string()
		};

		for path in self.glob_files(&full_pattern)? {
			let logical = if relative {
				path.strip_prefix(&self.working_dir).unwrap_or(&path)
			} else {
				path.as_path()
			};
			let key = normalize_key(logical);
			self.load_file(&path, key)?;
		}

		Ok(())
	}

	/// Load every `*.tf` file directly inside `dir`.
	pub fn load_all_template(&mut self, dir: &Path) -> Result<()> {
		let resolved = self.resolve(dir);
		if let Err(source) = std::fs::metadata(&resolved) {
			self.sink
				.error(&format!("Cannot access {}: {}", resolved.display(), source));
			return Err(LoaderError::DirectoryUnavailable {
				path: dir.to_path_buf(),
				source,
			});
		}

		let pattern = if dir.as_os_str().is_empty() {
			format!("*.{}", TEMPLATE_EXTENSION)
		} else {
			format!(
				"{}/*.{}",
				glob::Pattern::escape(&dir.to_string_lossy()),
				TEMPLATE_EXTENSION
			)
		};
		self.load_template(&pattern)
	}

	/// Load a module vendored under `.terraform/modules/<module_key>`.
	///
	/// Files are keyed as `<source>/<path within module>` so every consumer of
	/// the same source sees the same keys.
	pub fn load_module_file(&mut self, module_key_dir: &str, source: &str) -> Result<()> {
		self.sink.info(&format!("Load module `{}`", source));
		let module_dir = self.working_dir.join(MODULE_CACHE_DIR).join(module_key_dir);
		if let Err(err) = std::fs::metadata(&module_dir) {
			self.sink
				.error(&format!("Cannot access {}: {}", module_dir.display(), err));
			return Err(LoaderError::ModuleNotFound {
				source_id: source.to_string(),
				path: module_dir,
				source: err,
			});
		}

		let pattern = format!(
			"{}/**/*.{}",
			glob::Pattern::escape(&module_dir.to_string_lossy()),
			TEMPLATE_EXTENSION
		);
		for path in self.glob_files(&pattern)? {
			let within = path.strip_prefix(&module_dir).unwrap_or(&path);
			let key = module_key(source, within);
			self.load_file(&path, key)?;
		}

		Ok(())
	}

	fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
		let paths = glob::glob(pattern).map_err(|source| {
			self.sink
				.error(&format!("Invalid glob pattern `{}`: {}", pattern, source));
			LoaderError::InvalidPattern {
				pattern: pattern.to_string(),
				source,
			}
		})?;

		let mut files = Vec::new();
		for entry in paths {
			match entry {
				Ok(path) if path.is_dir() => {}
				Ok(path) => files.push(path),
				Err(err) => {
					let path = err.path().to_path_buf();
					self.sink
						.error(&format!("Cannot open file {}: {}", path.display(), err));
					return Err(LoaderError::CannotOpenFile {
						path,
						source: err.into(),
					});
				}
			}
		}
		Ok(files)
	}

	fn load_file(&mut self, path: &Path, key: String) -> Result<()> {
		self.sink
			.info(&format!("Load HCL file: `{}`", path.display()));

		let raw = std::fs::read(path).map_err(|source| {
			self.sink
				.error(&format!("Cannot open file {}: {}", path.display(), source));
			LoaderError::CannotOpenFile {
				path: path.to_path_buf(),
				source,
			}
		})?;

		let document = HclSyntax.parse(&raw).map_err(|source| {
			self.sink.error(&format!("{}: {}", path.display(), source));
			LoaderError::Parse {
				path: path.to_path_buf(),
				source,
			}
		})?;

		self.sink.debug(&format!("Stored `{}` as `{}`", path.display(), key));
		self.store.insert(key, raw, document);
		Ok(())
	}
}
