use std::fmt::Debug;
use std::sync::Arc;

use crate::behavior::Behavior;
use crate::behavior::ExtensibleBehavior;
use crate::context::ActorContext;
use crate::error::BehaviorResult;
use crate::frame::intercept;
use crate::interceptor::Interceptor;
use crate::log_messages::LogMessagesInterceptor;
use crate::log_messages::LogOptions;
use crate::monitor::MonitorInterceptor;
use crate::recipient::ActorRef;
use crate::signal::Signal;
use crate::stash::StashBuffer;
use crate::widen::WidenInterceptor;

type MessageHandler<M> = Box<dyn FnMut(&mut ActorContext, &M) -> BehaviorResult<M> + Send>;
type SignalHandler<M> = Box<dyn FnMut(&mut ActorContext, &Signal) -> BehaviorResult<M> + Send>;

/// A behavior built from closures. Missing handlers leave the input unhandled.
pub struct Receive<M> {
	on_message: Option<MessageHandler<M>>,
	on_signal: Option<SignalHandler<M>>,
}

impl<M: 'static> Receive<M> {
	pub fn new() -> Self {
		Self {
			on_message: None,
			on_signal: None,
		}
	}

	pub fn on_message<F>(mut self, handler: F) -> Self
	where
		F: FnMut(&mut ActorContext, &M) -> BehaviorResult<M> + Send + 'static,
	{
		self.on_message = Some(Box::new(handler));
		self
	}

	pub fn on_signal<F>(mut self, handler: F) -> Self
	where
		F: FnMut(&mut ActorContext, &Signal) -> BehaviorResult<M> + Send + 'static,
	{
		self.on_signal = Some(Box::new(handler));
		self
	}

	pub fn build(self) -> Behavior<M> {
		Behavior::extensible(self)
	}
}

impl<M: 'static> Default for Receive<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: 'static> ExtensibleBehavior<M> for Receive<M> {
	fn receive(&mut self, ctx: &mut ActorContext, message: &M) -> BehaviorResult<M> {
		match self.on_message.as_mut() {
			Some(handler) => handler(ctx, message),
			None => Ok(Behavior::Unhandled),
		}
	}

	fn receive_signal(&mut self, ctx: &mut ActorContext, signal: &Signal) -> BehaviorResult<M> {
		match self.on_signal.as_mut() {
			Some(handler) => handler(ctx, signal),
			None => Ok(Behavior::Unhandled),
		}
	}
}

/// Constructors for [`Behavior`] values.
pub struct Behaviors;

impl Behaviors {
	pub fn same<M>() -> Behavior<M> {
		Behavior::Same
	}

	pub fn unhandled<M>() -> Behavior<M> {
		Behavior::Unhandled
	}

	pub fn stopped<M>() -> Behavior<M> {
		Behavior::Stopped
	}

	pub fn empty<M>() -> Behavior<M> {
		Behavior::Empty
	}

	pub fn ignore<M>() -> Behavior<M> {
		Behavior::Ignore
	}

	/// Defer creating the behavior until the actor starts.
	pub fn setup<M, F>(factory: F) -> Behavior<M>
	where
		F: FnOnce(&mut ActorContext) -> BehaviorResult<M> + Send + 'static,
	{
		Behavior::Deferred(Box::new(factory))
	}

	pub fn receive<M, F, S>(on_message: F, on_signal: S) -> Behavior<M>
	where
		M: 'static,
		F: FnMut(&mut ActorContext, &M) -> BehaviorResult<M> + Send + 'static,
		S: FnMut(&mut ActorContext, &Signal) -> BehaviorResult<M> + Send + 'static,
	{
		Receive::new().on_message(on_message).on_signal(on_signal).build()
	}

	pub fn receive_message<M, F>(on_message: F) -> Behavior<M>
	where
		M: 'static,
		F: FnMut(&mut ActorContext, &M) -> BehaviorResult<M> + Send + 'static,
	{
		Receive::new().on_message(on_message).build()
	}

	pub fn receive_signal<M, F>(on_signal: F) -> Behavior<M>
	where
		M: 'static,
		F: FnMut(&mut ActorContext, &Signal) -> BehaviorResult<M> + Send + 'static,
	{
		Receive::new().on_signal(on_signal).build()
	}

	/// Wrap `behavior` with `interceptor`.
	///
	/// Wrapping a behavior whose stack already holds an equivalent interceptor leaves
	/// the stack as it is.
	pub fn intercept<O, I, X>(interceptor: Arc<X>, behavior: Behavior<I>) -> Behavior<O>
	where
		O: 'static,
		I: 'static,
		X: Interceptor<O, I>,
	{
		intercept(interceptor, behavior)
	}

	/// Send a copy of every message to `monitor` before handling it.
	pub fn monitor<M>(monitor: ActorRef<M>, behavior: Behavior<M>) -> Behavior<M>
	where
		M: Clone + Send + Sync + 'static,
	{
		intercept(Arc::new(MonitorInterceptor::new(monitor)), behavior)
	}

	/// Log every message and signal at debug level through the context sink.
	pub fn log_messages<M>(behavior: Behavior<M>) -> Behavior<M>
	where
		M: Debug + 'static,
	{
		Self::log_messages_with(LogOptions::default(), behavior)
	}

	pub fn log_messages_with<M>(options: LogOptions, behavior: Behavior<M>) -> Behavior<M>
	where
		M: Debug + 'static,
	{
		intercept(Arc::new(LogMessagesInterceptor::new(options)), behavior)
	}

	/// Accept `O` messages in a behavior handling `I`, through a partial transform.
	pub fn transform_messages<O, I>(interceptor: Arc<WidenInterceptor<O, I>>, behavior: Behavior<I>) -> Behavior<O>
	where
		O: 'static,
		I: 'static,
	{
		intercept(interceptor, behavior)
	}

	/// Shorthand for [`Behaviors::transform_messages`] with a fresh transform.
	pub fn widen<O, I, F>(transform: F, behavior: Behavior<I>) -> Behavior<O>
	where
		O: 'static,
		I: 'static,
		F: Fn(&O) -> Option<I> + Send + Sync + 'static,
	{
		Self::transform_messages(Arc::new(WidenInterceptor::new(transform)), behavior)
	}

	/// Give the behavior factory a stash buffer of `capacity` messages.
	pub fn with_stash<M, F>(capacity: usize, factory: F) -> Behavior<M>
	where
		M: Send + 'static,
		F: FnOnce(StashBuffer<M>) -> Behavior<M> + Send + 'static,
	{
		Self::setup(move |_ctx| Ok(factory(StashBuffer::new(capacity))))
	}
}
