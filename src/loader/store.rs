use crate::syntax::Document;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed documents and raw bytes for every loaded file, keyed by logical key.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
	templates: BTreeMap<String, Document>,
	files: BTreeMap<String, Vec<u8>>,
}

impl FileStore {
	/// Insert a file, replacing any earlier entry with the same key.
	pub fn insert(&mut self, key: String, raw: Vec<u8>, document: Document) {
		self.files.insert(key.clone(), raw);
		self.templates.insert(key, document);
	}

	pub fn templates(&self) -> &BTreeMap<String, Document> {
		&self.templates
	}

	pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
		&self.files
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

/// Turn a physical path into a logical key.
///
/// Backslashes become `/` and `.` components are dropped, so the same file
/// gets the same key whichever platform or spelling found it.
pub fn normalize_key(path: &Path) -> String {
	let mut key = path.to_string_lossy().replace('\\', "/");
	while key.contains("/./") {
		key = key.replace("/./", "/");
	}
	while let Some(rest) = key.strip_prefix("./") {
		key = rest.to_string();
	}
	key
}

/// Logical key for a file inside a module: `<source>/<path within module>`.
pub fn module_key(source: &str, path_within_module: &Path) -> String {
	let within = normalize_key(path_within_module);
	format!("{}/{}", source, within.trim_start_matches('/'))
}
