use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::Level;

use crate::behavior::Layer;
use crate::context::ActorContext;
use crate::context::LogSink;
use crate::error::BehaviorResult;
use crate::interceptor::Interceptor;
use crate::interceptor::ReceiveTarget;
use crate::interceptor::Sameness;
use crate::interceptor::SignalTarget;
use crate::signal::Signal;

/// Configuration of the message logging interceptor.
#[derive(Clone)]
pub struct LogOptions {
	enabled: bool,
	level: Level,
	sink: Option<Arc<dyn LogSink>>,
}

impl Default for LogOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			level: Level::DEBUG,
			sink: None,
		}
	}
}

impl Debug for LogOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LogOptions")
			.field("enabled", &self.enabled)
			.field("level", &self.level)
			.field("custom_sink", &self.sink.is_some())
			.finish()
	}
}

/// Sinks compare by identity.
impl PartialEq for LogOptions {
	fn eq(&self, other: &Self) -> bool {
		let same_sink = match (&self.sink, &other.sink) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		self.enabled == other.enabled && self.level == other.level && same_sink
	}
}

impl LogOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn with_level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}

	/// Log through `sink` instead of the actor context sink.
	pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	pub fn enabled(&self) -> bool {
		self.enabled
	}

	pub fn level(&self) -> Level {
		self.level
	}
}

/// Logs every message and signal before passing it on unchanged.
pub struct LogMessagesInterceptor {
	options: LogOptions,
}

impl LogMessagesInterceptor {
	pub fn new(options: LogOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &LogOptions {
		&self.options
	}

	fn log(&self, ctx: &ActorContext, message: fmt::Arguments<'_>) {
		if !self.options.enabled {
			return;
		}
		match &self.options.sink {
			Some(sink) => ctx.log_to(sink.as_ref(), self.options.level, message),
			None => ctx.log(self.options.level, message),
		}
	}
}

impl<M> Interceptor<M, M> for LogMessagesInterceptor
where
	M: Debug + 'static,
{
	fn around_receive(
		&self,
		ctx: &mut ActorContext,
		message: &M,
		target: ReceiveTarget<'_, M>,
	) -> BehaviorResult<M> {
		self.log(ctx, format_args!("actor [{}] received message: {:?}", ctx.path(), message));
		target.receive(ctx, message)
	}

	fn around_signal(
		&self,
		ctx: &mut ActorContext,
		signal: &Signal,
		target: SignalTarget<'_, M>,
	) -> BehaviorResult<M> {
		self.log(ctx, format_args!("actor [{}] received signal: {:?}", ctx.path(), signal));
		target.signal(ctx, signal)
	}

	fn is_same(&self, other: &dyn Layer) -> Sameness {
		match other.interceptor().downcast_ref::<LogMessagesInterceptor>() {
			Some(other) if other.options == self.options => Sameness::Same,
			_ => Sameness::Different,
		}
	}
}
