use super::Loader;
use crate::syntax::{HclSyntax, JsonSyntax, SyntaxParser, parse_with_fallback};
use std::path::Path;

/// Parsers tried, in order, for each variable file.
const TFVARS_PARSERS: [&dyn SyntaxParser; 2] = [&HclSyntax, &JsonSyntax];

impl Loader {
	/// Load variable override files in precedence order.
	///
	/// Each file is tried as HCL, then as JSON. Missing or unparsable files
	/// are reported and skipped; the rest still load.
	pub fn load_tfvars<I, P>(&mut self, paths: I)
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		self.sink.info("Load tfvars...");

		for path in paths {
			let path = path.as_ref();
			self.sink.info(&format!("Load `{}`", path.display()));
			let resolved = self.resolve(path);

			if let Err(err) = std::fs::metadata(&resolved) {
				self.sink
					.error(&format!("Skipping {}: {}", path.display(), err));
				continue;
			}

			let raw = match std::fs::read(&resolved) {
				Ok(raw) => raw,
				Err(err) => {
					self.sink
						.error(&format!("Cannot open file {}: {}", path.display(), err));
					continue;
				}
			};

			match parse_with_fallback(&TFVARS_PARSERS, &raw) {
				Ok(document) => self.tf_vars.push(document),
				Err(failures) => {
					for failure in failures {
						self.sink.error(&format!(
							"Parse error occurred by {}: {}",
							path.display(),
							failure
						));
					}
				}
			}
		}
	}
}
