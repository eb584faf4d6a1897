//! Diagnostic channel used by the loaders.
//!
//! The loaders never own the sink's lifecycle; a sink is handed to
//! [`crate::loader::Loader`] at construction. [`TracingSink`] forwards to
//! `tracing`, [`MemorySink`] keeps everything in memory.

use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
	Debug,
	Info,
	Warn,
	Error,
}

/// A write-only sink for leveled loader diagnostics.
///
/// Implementations must not fail; a sink that cannot deliver a message drops it.
pub trait DiagnosticSink: Send + Sync {
	fn emit(&self, severity: Severity, message: &str);

	fn debug(&self, message: &str) {
		self.emit(Severity::Debug, message);
	}

	fn info(&self, message: &str) {
		self.emit(Severity::Info, message);
	}

	fn warn(&self, message: &str) {
		self.emit(Severity::Warn, message);
	}

	fn error(&self, message: &str) {
		self.emit(Severity::Error, message);
	}
}

/// Sink that forwards every message to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn emit(&self, severity: Severity, message: &str) {
		match severity {
			Severity::Debug => tracing::debug!(target: "tfload", "{}", message),
			Severity::Info => tracing::info!(target: "tfload", "{}", message),
			Severity::Warn => tracing::warn!(target: "tfload", "{}", message),
			Severity::Error => tracing::error!(target: "tfload", "{}", message),
		}
	}
}

/// Sink that records messages, for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	records: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of all messages emitted so far.
	pub fn records(&self) -> Vec<(Severity, String)> {
		self.records
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Messages at the given severity.
	pub fn messages(&self, severity: Severity) -> Vec<String> {
		self.records()
			.into_iter()
			.filter(|(s, _)| *s == severity)
			.map(|(_, m)| m)
			.collect()
	}
}

impl DiagnosticSink for MemorySink {
	fn emit(&self, severity: Severity, message: &str) {
		self.records
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push((severity, message.to_string()));
	}
}

/// Install the global `tracing` subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` or `warn`.
/// Safe to call more than once.
pub fn init_tracing(debug: bool) {
	let default_level = if debug { "debug" } else { "warn" };
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(filter)
		.with_target(false)
		.try_init()
		.ok();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_memory_sink_records_in_order() {
		let sink = MemorySink::new();
		sink.info("first");
		sink.error("second");
		sink.debug("third");

		let records = sink.records();
		assert_eq!(records.len(), 3);
		assert_eq!(records[0], (Severity::Info, "first".to_string()));
		assert_eq!(records[1], (Severity::Error, "second".to_string()));
		assert_eq!(sink.messages(Severity::Debug), vec!["third".to_string()]);
	}

	#[test]
	fn test_memory_sink_clones_share_records() {
		let sink = MemorySink::new();
		let handle = sink.clone();
		handle.warn("shared");
		assert_eq!(sink.messages(Severity::Warn), vec!["shared".to_string()]);
	}

	#[test]
	fn test_memory_sink_keeps_recording_after_poison() {
		let sink = MemorySink::new();
		sink.info("before");

		let records = Arc::clone(&sink.records);
		let _ = std::thread::spawn(move || {
			let _guard = records.lock().unwrap();
			panic!("poison the lock");
		})
		.join();

		sink.info("after");
		assert_eq!(
			sink.messages(Severity::Info),
			vec!["before".to_string(), "after".to_string()]
		);
	}

	#[test]
	fn test_tracing_sink_without_subscriber_does_not_panic() {
		TracingSink.error("no subscriber installed");
	}
}
