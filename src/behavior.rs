use std::any::Any;
use std::any::type_name;
use std::fmt;

use downcast_rs::Downcast;
use downcast_rs::impl_downcast;

use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;
use crate::interceptor::TransformId;
use crate::signal::Signal;
use crate::stash::UnstashingBehavior;

/// Upper bound on the number of interceptor frames walked while inspecting a stack.
pub const MAX_STACK_DEPTH: usize = 1024;

pub type DeferredFactory<M> = Box<dyn FnOnce(&mut ActorContext) -> BehaviorResult<M> + Send>;

/// How an actor reacts to the next message or signal.
///
/// `Same` and `Unhandled` are markers relative to the behavior currently installed;
/// whoever owns that behavior keeps it in place when one of them comes back.
pub enum Behavior<M> {
	Same,
	Unhandled,
	Stopped,
	/// Alive, treats every message as unhandled.
	Empty,
	/// Alive, silently drops every message.
	Ignore,
	/// Created from the actor context when the behavior is started.
	Deferred(DeferredFactory<M>),
	/// Replaying previously stashed messages.
	Unstashing(Box<dyn UnstashingBehavior<M>>),
	Extensible(Box<dyn ExtensibleBehavior<M>>),
}

/// A behavior that handles messages and signals itself.
pub trait ExtensibleBehavior<M>: Downcast + Send {
	fn receive(&mut self, ctx: &mut ActorContext, message: &M) -> BehaviorResult<M>;

	fn receive_signal(&mut self, ctx: &mut ActorContext, signal: &Signal) -> BehaviorResult<M>;

	/// The interceptor frame view of this behavior, if it is one.
	fn layer(&self) -> Option<&dyn Layer> {
		None
	}

	fn describe(&self) -> &'static str {
		type_name::<Self>()
	}
}

impl_downcast!(ExtensibleBehavior<M>);

/// Type-erased view of one interceptor frame in a behavior stack.
///
/// Frames on different levels of a stack speak different message types, so the walk
/// down the stack goes through this view rather than through `Behavior` itself.
pub trait Layer {
	/// The interceptor instance owned by this frame.
	fn interceptor(&self) -> &dyn Any;

	fn interceptor_name(&self) -> &'static str;

	/// Identity of the message transform, for frames that narrow messages.
	fn transform_id(&self) -> Option<TransformId>;

	/// The next frame down, if the nested behavior is itself a frame.
	fn nested(&self) -> Option<&dyn Layer>;
}

impl<M: 'static> fmt::Debug for Behavior<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Behavior::Same => f.write_str("Same"),
			Behavior::Unhandled => f.write_str("Unhandled"),
			Behavior::Stopped => f.write_str("Stopped"),
			Behavior::Empty => f.write_str("Empty"),
			Behavior::Ignore => f.write_str("Ignore"),
			Behavior::Deferred(_) => f.write_str("Deferred"),
			Behavior::Unstashing(_) => f.write_str("Unstashing"),
			Behavior::Extensible(b) => write!(f, "Extensible({})", b.describe()),
		}
	}
}

impl<M: 'static> Behavior<M> {
	pub fn extensible<B>(behavior: B) -> Self
	where
		B: ExtensibleBehavior<M> + 'static,
	{
		Behavior::Extensible(Box::new(behavior))
	}

	/// The concrete behavior, if it is a `B`.
	pub fn downcast_ref<B>(&self) -> Option<&B>
	where
		B: ExtensibleBehavior<M>,
	{
		match self {
			Behavior::Extensible(behavior) => behavior.downcast_ref::<B>(),
			_ => None,
		}
	}

	pub fn is_same(&self) -> bool {
		matches!(self, Behavior::Same)
	}

	pub fn is_unhandled(&self) -> bool {
		matches!(self, Behavior::Unhandled)
	}

	pub fn is_alive(&self) -> bool {
		!matches!(self, Behavior::Stopped)
	}

	pub fn is_deferred(&self) -> bool {
		matches!(self, Behavior::Deferred(_))
	}

	/// Run deferred factories until the behavior is ready to handle messages.
	pub fn start(self, ctx: &mut ActorContext) -> BehaviorResult<M> {
		let mut behavior = self;
		loop {
			match behavior {
				Behavior::Deferred(factory) => behavior = factory(ctx)?,
				ready => return Ok(ready),
			}
		}
	}

	/// Resolve the result of a dispatch against the behavior currently installed.
	///
	/// Markers stay markers and keep referring to the installed behavior. Deferred
	/// results are started, anything else replaces the installed behavior.
	pub fn canonicalize(self, ctx: &mut ActorContext) -> BehaviorResult<M> {
		match self {
			Behavior::Deferred(_) => self.start(ctx)?.canonicalize(ctx),
			other => Ok(other),
		}
	}

	pub fn interpret_message(&mut self, ctx: &mut ActorContext, message: &M) -> BehaviorResult<M> {
		match self {
			Behavior::Extensible(behavior) => behavior.receive(ctx, message),
			Behavior::Empty => Ok(Behavior::Unhandled),
			Behavior::Ignore => Ok(Behavior::Same),
			Behavior::Stopped => Ok(Behavior::Stopped),
			Behavior::Same | Behavior::Unhandled => {
				Err(BehaviorError::IllegalState("a marker cannot handle messages"))
			}
			Behavior::Deferred(_) => Err(BehaviorError::IllegalState(
				"a deferred behavior must be started before handling messages",
			)),
			Behavior::Unstashing(_) => Err(BehaviorError::IllegalState(
				"an unstashing behavior must be stepped before handling messages",
			)),
		}
	}

	pub fn interpret_signal(&mut self, ctx: &mut ActorContext, signal: &Signal) -> BehaviorResult<M> {
		match self {
			Behavior::Extensible(behavior) => behavior.receive_signal(ctx, signal),
			Behavior::Empty | Behavior::Ignore => Ok(Behavior::Unhandled),
			Behavior::Stopped => Ok(Behavior::Stopped),
			Behavior::Same | Behavior::Unhandled => {
				Err(BehaviorError::IllegalState("a marker cannot handle signals"))
			}
			Behavior::Deferred(_) => Err(BehaviorError::IllegalState(
				"a deferred behavior must be started before handling signals",
			)),
			Behavior::Unstashing(_) => Err(BehaviorError::IllegalState(
				"an unstashing behavior must be stepped before handling signals",
			)),
		}
	}

	/// Top frame of the interceptor stack embedded in this behavior.
	pub fn layer(&self) -> Option<&dyn Layer> {
		match self {
			Behavior::Extensible(behavior) => behavior.layer(),
			Behavior::Unstashing(unstashing) => unstashing.current_behavior().layer(),
			_ => None,
		}
	}

	/// Walk the interceptor frames of this behavior, top to bottom, until `predicate`
	/// holds for one of them.
	pub fn exists_in_stack<F>(&self, mut predicate: F) -> Result<bool, BehaviorError>
	where
		F: FnMut(&dyn Layer) -> Result<bool, BehaviorError>,
	{
		let mut current = self.layer();
		let mut depth = 0;
		while let Some(layer) = current {
			if depth == MAX_STACK_DEPTH {
				return Err(BehaviorError::StackTooDeep(MAX_STACK_DEPTH));
			}
			if predicate(layer)? {
				return Ok(true);
			}
			current = layer.nested();
			depth += 1;
		}
		Ok(false)
	}

	/// Number of interceptor frames stacked on top of the innermost behavior.
	pub fn stack_depth(&self) -> Result<usize, BehaviorError> {
		let mut depth = 0;
		self.exists_in_stack(|_| {
			depth += 1;
			Ok(false)
		})?;
		Ok(depth)
	}

	/// Reinterpret this behavior as one handling `N`.
	///
	/// Markers carry no message type and always convert. Anything else converts only
	/// when `M` and `N` are the same type at runtime.
	pub fn cast<N: 'static>(self) -> BehaviorResult<N> {
		match self {
			Behavior::Same => Ok(Behavior::Same),
			Behavior::Unhandled => Ok(Behavior::Unhandled),
			Behavior::Stopped => Ok(Behavior::Stopped),
			Behavior::Empty => Ok(Behavior::Empty),
			Behavior::Ignore => Ok(Behavior::Ignore),
			other => {
				let boxed: Box<dyn Any> = Box::new(other);
				boxed
					.downcast::<Behavior<N>>()
					.map(|behavior| *behavior)
					.map_err(|_| BehaviorError::boundary::<M, N>())
			}
		}
	}
}
