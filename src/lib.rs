//! tfload - loads Terraform configuration for lint tooling.
//!
//! This library provides:
//! - Template and module discovery with stable logical file keys
//! - Deployment state lookup across workspaces and remote backends
//! - Variable file loading in HCL or JSON
//! - `.tfload.toml` configuration cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tfload::loader::Loader;
//!
//! let mut loader = Loader::with_tracing(".");
//! loader.load_all_template(Path::new(".")).unwrap();
//! loader.load_module_file("1-vpc", "./modules/vpc").unwrap();
//! loader.load_state();
//! loader.load_tfvars(["terraform.tfvars"]);
//!
//! let snapshot = loader.dump();
//! for key in snapshot.templates.keys() {
//!     println!("{}", key);
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod syntax;

pub use error::{LoaderError, Result};
