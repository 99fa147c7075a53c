use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::Level;

/// A single record handed to a [`LogSink`].
#[derive(Debug)]
pub struct LogRecord<'a> {
	pub level: Level,
	pub actor: &'a str,
	pub metadata: &'a BTreeMap<String, String>,
	pub message: fmt::Arguments<'a>,
}

/// Destination for records produced while an actor handles a message.
pub trait LogSink: Send + Sync + 'static {
	fn log(&self, record: &LogRecord<'_>);
}

/// Default sink, forwards every record to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
	fn log(&self, record: &LogRecord<'_>) {
		let actor = record.actor;
		let metadata = record.metadata;
		let message = record.message;
		// tracing needs the level at compile time
		match record.level {
			Level::ERROR => tracing::error!(actor, ?metadata, "{message}"),
			Level::WARN => tracing::warn!(actor, ?metadata, "{message}"),
			Level::INFO => tracing::info!(actor, ?metadata, "{message}"),
			Level::DEBUG => tracing::debug!(actor, ?metadata, "{message}"),
			_ => tracing::trace!(actor, ?metadata, "{message}"),
		}
	}
}

/// Ambient context for one actor, shared by every layer of its behavior stack.
///
/// The context outlives individual dispatches, so metadata written while handling
/// one message is visible to the next.
pub struct ActorContext {
	path: String,
	log: Arc<dyn LogSink>,
	metadata: BTreeMap<String, String>,
}

impl fmt::Debug for ActorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActorContext")
			.field("path", &self.path)
			.field("metadata", &self.metadata)
			.finish()
	}
}

impl ActorContext {
	pub fn new(path: impl Into<String>) -> Self {
		Self::with_sink(path, Arc::new(TracingSink))
	}

	pub fn with_sink(path: impl Into<String>, log: Arc<dyn LogSink>) -> Self {
		Self {
			path: path.into(),
			log,
			metadata: BTreeMap::new(),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn sink(&self) -> &Arc<dyn LogSink> {
		&self.log
	}

	/// Write a record through `sink`, stamped with this actor's path and metadata.
	pub fn log_to(&self, sink: &dyn LogSink, level: Level, message: fmt::Arguments<'_>) {
		sink.log(&LogRecord {
			level,
			actor: &self.path,
			metadata: &self.metadata,
			message,
		});
	}

	/// Write a record through the context sink.
	pub fn log(&self, level: Level, message: fmt::Arguments<'_>) {
		self.log_to(self.log.as_ref(), level, message)
	}

	pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.metadata.insert(key.into(), value.into());
	}

	pub fn metadata(&self, key: &str) -> Option<&str> {
		self.metadata.get(key).map(String::as_str)
	}

	pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
		self.metadata.remove(key)
	}
}
