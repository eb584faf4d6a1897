//! Loading of Terraform configuration into memory.
//!
//! This module handles:
//! - Root templates and wildcard patterns
//! - Vendored modules under `.terraform/modules`
//! - Deployment state discovery (workspace, local, remote)
//! - Variable override files in HCL or JSON
//!
//! A [`Loader`] is one session. Every load takes `&mut self`; hosts that share
//! a session between threads wrap the whole loader in a single `Mutex`.

pub mod state;
pub mod store;
pub mod template;
pub mod tfvars;

pub use state::{ModuleState, RemoteState, TfState};
pub use store::{FileStore, module_key, normalize_key};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::syntax::Document;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything loaded so far, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
	/// Parsed templates by logical key.
	pub templates: &'a BTreeMap<String, Document>,

	/// Raw bytes by logical key.
	pub files: &'a BTreeMap<String, Vec<u8>>,

	/// Deployment state, or its zero value when none was found.
	pub state: &'a TfState,

	/// Variable overlays in precedence order (last wins).
	pub tf_vars: &'a [Document],
}

/// A loading session rooted at a working directory.
pub struct Loader {
	working_dir: PathBuf,
	sink: Arc<dyn DiagnosticSink>,
	store: FileStore,
	state: TfState,
	tf_vars: Vec<Document>,
}

impl std::fmt::Debug for Loader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Loader")
			.field("working_dir", &self.working_dir)
			.field("store", &self.store)
			.field("state", &self.state)
			.field("tf_vars", &self.tf_vars.len())
			.finish()
	}
}

impl Loader {
	/// Create an empty session that reports through `sink`.
	pub fn new(working_dir: impl Into<PathBuf>, sink: Arc<dyn DiagnosticSink>) -> Self {
		Loader {
			working_dir: working_dir.into(),
			sink,
			store: FileStore::default(),
			state: TfState::default(),
			tf_vars: Vec::new(),
		}
	}

	/// Create an empty session that reports through `tracing`.
	pub fn with_tracing(working_dir: impl Into<PathBuf>) -> Self {
		Self::new(working_dir, Arc::new(TracingSink))
	}

	pub fn working_dir(&self) -> &Path {
		&self.working_dir
	}

	/// Borrow everything loaded so far. May be partial.
	pub fn dump(&self) -> Snapshot<'_> {
		Snapshot {
			templates: self.store.templates(),
			files: self.store.files(),
			state: &self.state,
			tf_vars: &self.tf_vars,
		}
	}

	/// Resolve a caller path against the working directory.
	fn resolve(&self, path: &Path) -> PathBuf {
		if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.working_dir.join(path)
		}
	}
}
