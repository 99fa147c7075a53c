use std::any::Any;
use std::sync::Arc;

use crate::behavior::Behavior;
use crate::behavior::ExtensibleBehavior;
use crate::behavior::Layer;
use crate::census::FrameCount;
use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;
use crate::interceptor::Interceptor;
use crate::interceptor::NestedSlot;
use crate::interceptor::ReceiveTarget;
use crate::interceptor::Sameness;
use crate::interceptor::SignalTarget;
use crate::interceptor::StartTarget;
use crate::interceptor::TransformId;
use crate::message::MessageFilter;
use crate::message::narrow;
use crate::signal::Signal;

/// Wrap `nested` with `interceptor`. The interceptor sees the actor start when the
/// returned behavior is started.
pub fn intercept<O, I, X>(interceptor: Arc<X>, nested: Behavior<I>) -> Behavior<O>
where
	O: 'static,
	I: 'static,
	X: Interceptor<O, I>,
{
	let interceptor: Arc<dyn Interceptor<O, I>> = interceptor;
	Behavior::Deferred(Box::new(move |ctx: &mut ActorContext| {
		InterceptorFrame::pre_start(interceptor, nested, ctx)
	}))
}

/// One layer of a behavior stack: an interceptor and the behavior it wraps.
pub struct InterceptorFrame<O: 'static, I: 'static> {
	interceptor: Arc<dyn Interceptor<O, I>>,
	filter: Option<MessageFilter<O>>,
	nested: NestedSlot<I>,
	_count: FrameCount,
}

impl<O: 'static, I: 'static> InterceptorFrame<O, I> {
	fn new(interceptor: Arc<dyn Interceptor<O, I>>, nested: NestedSlot<I>) -> Self {
		let filter = interceptor.message_filter();
		let count = {
			let erased: &dyn Interceptor<O, I> = &*interceptor;
			FrameCount::new(erased.as_any().type_id(), erased.name())
		};
		Self {
			interceptor,
			filter,
			nested,
			_count: count,
		}
	}

	fn pre_start(
		interceptor: Arc<dyn Interceptor<O, I>>,
		nested: Behavior<I>,
		ctx: &mut ActorContext,
	) -> BehaviorResult<O> {
		let started = interceptor.around_start(ctx, StartTarget::new(nested))?;
		if started.is_same() || started.is_unhandled() {
			return Err(BehaviorError::IllegalState("an interceptor cannot start as a marker"));
		}

		let mut slot = NestedSlot::vacant();
		match deduplicate(interceptor.as_ref(), &mut slot, started, ctx)? {
			Behavior::Same => Ok(Behavior::extensible(Self::new(interceptor, slot))),
			outcome => Ok(outcome),
		}
	}

	pub fn interceptor(&self) -> &Arc<dyn Interceptor<O, I>> {
		&self.interceptor
	}

	pub fn nested_behavior(&self) -> &Behavior<I> {
		self.nested.committed()
	}

	/// A new frame applying the same interceptor to `nested`. This frame is left as is.
	pub fn replace_nested(&self, nested: Behavior<I>) -> InterceptorFrame<O, I> {
		Self::new(self.interceptor.clone(), NestedSlot::new(nested))
	}

	pub fn into_nested(self) -> Behavior<I> {
		self.nested.into_committed()
	}
}

impl<O: 'static, I: 'static> ExtensibleBehavior<O> for InterceptorFrame<O, I> {
	fn receive(&mut self, ctx: &mut ActorContext, message: &O) -> BehaviorResult<O> {
		let target = ReceiveTarget::new(&mut self.nested);
		let result = match &self.filter {
			Some(filter) if !filter.accepts(message) => target.receive(ctx, narrow::<O, I>(message)?),
			_ => self.interceptor.around_receive(ctx, message, target),
		}?;
		deduplicate(self.interceptor.as_ref(), &mut self.nested, result, ctx)
	}

	fn receive_signal(&mut self, ctx: &mut ActorContext, signal: &Signal) -> BehaviorResult<O> {
		let target = SignalTarget::new(&mut self.nested);
		let result = self.interceptor.around_signal(ctx, signal, target)?;
		deduplicate(self.interceptor.as_ref(), &mut self.nested, result, ctx)
	}

	fn layer(&self) -> Option<&dyn Layer> {
		Some(self)
	}

	fn describe(&self) -> &'static str {
		self.interceptor.name()
	}
}

impl<O: 'static, I: 'static> Layer for InterceptorFrame<O, I> {
	fn interceptor(&self) -> &dyn Any {
		let erased: &dyn Interceptor<O, I> = &*self.interceptor;
		erased.as_any()
	}

	fn interceptor_name(&self) -> &'static str {
		self.interceptor.name()
	}

	fn transform_id(&self) -> Option<TransformId> {
		self.interceptor.transform_id()
	}

	fn nested(&self) -> Option<&dyn Layer> {
		self.nested.committed().layer()
	}
}

/// Decide what the outer layer sees after an interceptor hook produced `result`.
///
/// Markers and terminal outcomes pass through. A result that already carries an
/// equivalent interceptor somewhere in its stack replaces this frame. Anything
/// else becomes the new nested behavior of this frame, reported as `Same`.
fn deduplicate<O: 'static, I: 'static>(
	interceptor: &dyn Interceptor<O, I>,
	slot: &mut NestedSlot<I>,
	result: Behavior<I>,
	ctx: &mut ActorContext,
) -> BehaviorResult<O> {
	let started = result.start(ctx)?;
	if started.is_same() || started.is_unhandled() || !started.is_alive() {
		return started.cast();
	}

	let duplicate = started.exists_in_stack(|layer| match interceptor.is_same(layer) {
		Sameness::Same => Ok(true),
		Sameness::Different => Ok(false),
		Sameness::Incompatible(reason) => Err(BehaviorError::IncompatibleInterceptors(reason)),
	})?;

	if duplicate {
		tracing::trace!(
			actor = ctx.path(),
			interceptor = interceptor.name(),
			"Flattening repeated interceptor"
		);
		metrics::counter!("runy_behavior.frames.flattened").increment(1);
		return started.cast();
	}

	tracing::trace!(
		actor = ctx.path(),
		interceptor = interceptor.name(),
		"Wrapping new nested behavior"
	);
	metrics::counter!("runy_behavior.frames.wrapped").increment(1);
	slot.install(started, ctx)?.cast()
}
