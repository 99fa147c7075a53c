use std::any::Any;
use std::any::type_name;
use std::mem;
use std::sync::Arc;

use downcast_rs::DowncastSync;
use downcast_rs::impl_downcast;

use crate::behavior::Behavior;
use crate::behavior::Layer;
use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;
use crate::message::MessageFilter;
use crate::signal::Signal;
use crate::stash::UnstashingBehavior;

/// Outcome of comparing two interceptors while deduplicating a stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sameness {
	Same,
	Different,
	/// The two interceptors can never live in the same stack.
	Incompatible(String),
}

/// Identity of a shared message transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformId(usize);

impl TransformId {
	pub fn of<T: ?Sized>(transform: &Arc<T>) -> Self {
		TransformId(Arc::as_ptr(transform).cast::<()>() as usize)
	}
}

/// A cross-cutting policy wrapped around a behavior handling `I`, exposed to the
/// outside as a behavior handling `O`.
///
/// Hooks receive a target that runs the nested behavior; an interceptor decides
/// whether and with what to call it. Interceptors are shared between the frames of
/// one stack and must not keep per-message state.
pub trait Interceptor<O, I>: DowncastSync
where
	O: 'static,
	I: 'static,
{
	fn around_start(&self, ctx: &mut ActorContext, target: StartTarget<I>) -> BehaviorResult<I> {
		target.start(ctx)
	}

	fn around_receive(
		&self,
		ctx: &mut ActorContext,
		message: &O,
		target: ReceiveTarget<'_, I>,
	) -> BehaviorResult<I>;

	fn around_signal(
		&self,
		ctx: &mut ActorContext,
		signal: &Signal,
		target: SignalTarget<'_, I>,
	) -> BehaviorResult<I> {
		target.signal(ctx, signal)
	}

	/// Whether `other` already applies this policy. Defaults to instance identity.
	fn is_same(&self, other: &dyn Layer) -> Sameness {
		let this = (self as *const Self).cast::<()>();
		let that = (other.interceptor() as *const dyn Any).cast::<()>();
		if std::ptr::eq(this, that) {
			Sameness::Same
		} else {
			Sameness::Different
		}
	}

	/// Messages rejected by the filter bypass `around_receive` entirely.
	fn message_filter(&self) -> Option<MessageFilter<O>> {
		None
	}

	fn transform_id(&self) -> Option<TransformId> {
		None
	}

	fn name(&self) -> &'static str {
		type_name::<Self>()
	}
}

impl_downcast!(sync Interceptor<O, I> where O: 'static, I: 'static);

/// Starts the nested behavior.
pub struct StartTarget<I> {
	initial: Behavior<I>,
}

impl<I: 'static> StartTarget<I> {
	pub(crate) fn new(initial: Behavior<I>) -> Self {
		Self { initial }
	}

	pub fn start(self, ctx: &mut ActorContext) -> BehaviorResult<I> {
		let started = self.initial.start(ctx)?;
		if started.is_same() || started.is_unhandled() {
			return Err(BehaviorError::IllegalState("an actor cannot start as a marker"));
		}
		let mut slot = NestedSlot::vacant();
		match slot.advance(started, ctx)? {
			Behavior::Same => Ok(slot.committed),
			next => Ok(next),
		}
	}
}

/// Delivers a message to the nested behavior.
pub struct ReceiveTarget<'a, I> {
	slot: &'a mut NestedSlot<I>,
}

impl<'a, I: 'static> ReceiveTarget<'a, I> {
	pub(crate) fn new(slot: &'a mut NestedSlot<I>) -> Self {
		Self { slot }
	}

	pub fn receive(self, ctx: &mut ActorContext, message: &I) -> BehaviorResult<I> {
		let next = self.slot.committed.interpret_message(ctx, message)?;
		self.slot.advance(next, ctx)
	}
}

/// Delivers a signal to the nested behavior.
pub struct SignalTarget<'a, I> {
	slot: &'a mut NestedSlot<I>,
}

impl<'a, I: 'static> SignalTarget<'a, I> {
	pub(crate) fn new(slot: &'a mut NestedSlot<I>) -> Self {
		Self { slot }
	}

	pub fn signal(self, ctx: &mut ActorContext, signal: &Signal) -> BehaviorResult<I> {
		let next = self.slot.committed.interpret_signal(ctx, signal)?;
		self.slot.advance(next, ctx)
	}
}

/// The nested behavior of a frame.
///
/// `pending` is set only while a replay runs; `committed` is vacant (`Same`) for
/// exactly that time and is restored from the replay on both success and failure.
pub(crate) struct NestedSlot<I> {
	committed: Behavior<I>,
	pending: Option<Box<dyn UnstashingBehavior<I>>>,
}

impl<I: 'static> NestedSlot<I> {
	pub(crate) fn new(committed: Behavior<I>) -> Self {
		Self {
			committed,
			pending: None,
		}
	}

	pub(crate) fn vacant() -> Self {
		Self::new(Behavior::Same)
	}

	pub(crate) fn committed(&self) -> &Behavior<I> {
		&self.committed
	}

	pub(crate) fn committed_mut(&mut self) -> &mut Behavior<I> {
		&mut self.committed
	}

	pub(crate) fn into_committed(self) -> Behavior<I> {
		self.committed
	}

	/// Apply the outcome of the nested behavior. An unstashing outcome is replayed
	/// into the slot right away and reported as `Same`; anything else comes back
	/// canonicalized for the caller to deduplicate.
	pub(crate) fn advance(&mut self, next: Behavior<I>, ctx: &mut ActorContext) -> BehaviorResult<I> {
		match next {
			Behavior::Unstashing(unstashing) => self.replay(unstashing, ctx),
			other => other.canonicalize(ctx),
		}
	}

	/// Make `behavior` the nested behavior. Returns `Same` once installed, or
	/// `Stopped` when the installed behavior is terminal.
	pub(crate) fn install(&mut self, behavior: Behavior<I>, ctx: &mut ActorContext) -> BehaviorResult<I> {
		match behavior {
			Behavior::Unstashing(unstashing) => self.replay(unstashing, ctx),
			other => {
				let alive = other.is_alive();
				self.committed = other;
				Ok(if alive { Behavior::Same } else { Behavior::Stopped })
			}
		}
	}

	fn replay(
		&mut self,
		unstashing: Box<dyn UnstashingBehavior<I>>,
		ctx: &mut ActorContext,
	) -> BehaviorResult<I> {
		let previous = mem::replace(&mut self.committed, Behavior::Same);
		let pending = self.pending.insert(unstashing);

		match pending.unstash(previous, ctx) {
			Ok(next) if next.is_alive() => {
				self.pending = None;
				self.committed = next;
				Ok(Behavior::Same)
			}
			Ok(stopped) => {
				if let Some(pending) = self.pending.take() {
					self.committed = pending.into_current_behavior();
				}
				Ok(stopped)
			}
			Err(err) => {
				self.rollback(ctx, &err);
				Err(err)
			}
		}
	}

	fn rollback(&mut self, ctx: &ActorContext, err: &BehaviorError) {
		if let Some(pending) = self.pending.take() {
			tracing::warn!(
				actor = ctx.path(),
				error = %err,
				"Unstash failed, rolling back to the last replayed behavior"
			);
			metrics::counter!("runy_behavior.unstash.rollbacks").increment(1);
			self.committed = pending.into_current_behavior();
		}
	}
}
