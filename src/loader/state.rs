use super::Loader;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// State file written by `terraform apply` for the default workspace.
pub const LOCAL_STATE_PATH: &str = "terraform.tfstate";

/// Local copy of the state kept by a configured remote backend.
pub const REMOTE_STATE_PATH: &str = ".terraform/terraform.tfstate";

/// File naming the currently selected workspace.
pub const ENVIRONMENT_PATH: &str = ".terraform/environment";

/// Directory holding one state file per non-default workspace.
pub const WORKSPACE_STATE_DIR: &str = "terraform.tfstate.d";

pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Deployment state as written by Terraform.
///
/// Only the envelope is typed; module and resource bodies are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TfState {
	pub version: u64,
	pub terraform_version: String,
	pub serial: u64,
	pub lineage: String,
	pub remote: Option<RemoteState>,
	pub backend: Option<RemoteState>,
	pub modules: Vec<ModuleState>,

	/// Flat resource list used by state format 4 and later.
	pub resources: Vec<Value>,
}

/// Remote or backend configuration recorded in the state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteState {
	#[serde(rename = "type")]
	pub kind: String,
	pub config: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModuleState {
	pub path: Vec<String>,
	pub outputs: BTreeMap<String, Value>,
	pub resources: BTreeMap<String, Value>,
	pub depends_on: Vec<String>,
}

impl TfState {
	/// True until a state file has been loaded.
	pub fn is_empty(&self) -> bool {
		*self == TfState::default()
	}

	/// Number of resources across all modules and the flat list.
	pub fn resource_count(&self) -> usize {
		self.resources.len()
			+ self
				.modules
				.iter()
				.map(|m| m.resources.len())
				.sum::<usize>()
	}
}

/// Local state path for a workspace.
pub fn local_state_path(environment: Option<&str>) -> PathBuf {
	match environment {
		Some(env) if !env.is_empty() && env != DEFAULT_ENVIRONMENT => {
			PathBuf::from(WORKSPACE_STATE_DIR)
				.join(env)
				.join(LOCAL_STATE_PATH)
		}
		_ => PathBuf::from(LOCAL_STATE_PATH),
	}
}

impl Loader {
	/// Load the deployment state, if there is one.
	///
	/// The local state of the selected workspace wins over the remote copy.
	/// Nothing here fails the caller: missing or broken state is reported to
	/// the diagnostic sink and the previous state is kept.
	pub fn load_state(&mut self) {
		self.sink.info("Load environment...");
		let marker = self.working_dir.join(ENVIRONMENT_PATH);
		let environment = match std::fs::read_to_string(&marker) {
			Ok(content) => {
				let env = content.trim().to_string();
				self.sink
					.info(&format!("Environment file detected. env: {}", env));
				Some(env)
			}
			Err(err) => {
				self.sink.debug(&format!("No environment file: {}", err));
				None
			}
		};

		self.sink.info("Load tfstate...");
		let local = self.working_dir.join(local_state_path(environment.as_deref()));
		let remote = self.working_dir.join(REMOTE_STATE_PATH);

		let state_path = if local.exists() {
			self.sink.info("Local state detected");
			local
		} else if remote.exists() {
			self.sink.info("Remote state detected");
			remote
		} else {
			self.sink.debug("No state file found");
			return;
		};

		let bytes = match std::fs::read(&state_path) {
			Ok(bytes) => bytes,
			Err(err) => {
				self.sink
					.error(&format!("Cannot read {}: {}", state_path.display(), err));
				return;
			}
		};

		match serde_json::from_slice::<TfState>(&bytes) {
			Ok(state) => self.state = state,
			Err(err) => self
				.sink
				.error(&format!("Invalid state file {}: {}", state_path.display(), err)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_local_state_path_default() {
		assert_eq!(local_state_path(None), PathBuf::from("terraform.tfstate"));
		assert_eq!(
			local_state_path(Some("default")),
			PathBuf::from("terraform.tfstate")
		);
		assert_eq!(local_state_path(Some("")), PathBuf::from("terraform.tfstate"));
	}

	#[test]
	fn test_local_state_path_workspace() {
		assert_eq!(
			local_state_path(Some("staging")),
			PathBuf::from("terraform.tfstate.d/staging/terraform.tfstate")
		);
	}

	#[test]
	fn test_parse_legacy_state() {
		let json = r#"{
			"version": 3,
			"terraform_version": "0.9.11",
			"serial": 7,
			"lineage": "8f5c1e2a",
			"remote": {"type": "s3", "config": {"bucket": "tf-state"}},
			"modules": [{
				"path": ["root"],
				"outputs": {},
				"resources": {"aws_instance.web": {"type": "aws_instance"}},
				"depends_on": []
			}]
		}"#;
		let state: TfState = serde_json::from_str(json).unwrap();

		assert_eq!(state.version, 3);
		assert_eq!(state.serial, 7);
		assert_eq!(state.remote.as_ref().unwrap().kind, "s3");
		assert_eq!(state.modules[0].path, vec!["root".to_string()]);
		assert_eq!(state.resource_count(), 1);
		assert!(!state.is_empty());
	}

	#[test]
	fn test_parse_state_ignores_unknown_fields() {
		let json = r#"{"version": 4, "check_results": null, "resources": [{"mode": "managed"}]}"#;
		let state: TfState = serde_json::from_str(json).unwrap();
		assert_eq!(state.version, 4);
		assert_eq!(state.resource_count(), 1);
	}

	#[test]
	fn test_default_state_is_empty() {
		assert!(TfState::default().is_empty());
	}
}
