use std::sync::Arc;

use crate::behavior::Behavior;
use crate::behavior::Layer;
use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;
use crate::interceptor::Interceptor;
use crate::interceptor::ReceiveTarget;
use crate::interceptor::Sameness;
use crate::interceptor::TransformId;
use crate::message::as_timer;

pub type Transform<O, I> = Arc<dyn Fn(&O) -> Option<I> + Send + Sync>;

/// Lets a behavior handling `I` accept `O` by running each message through a
/// partial transform. Messages the transform declines are unhandled.
///
/// A stack holds at most one transform: stacking a second, different one is an
/// error because the order of the two would be ambiguous.
pub struct WidenInterceptor<O, I> {
	transform: Transform<O, I>,
}

impl<O, I> WidenInterceptor<O, I> {
	pub fn new<F>(transform: F) -> Self
	where
		F: Fn(&O) -> Option<I> + Send + Sync + 'static,
	{
		Self {
			transform: Arc::new(transform),
		}
	}

	/// Reuse a transform that is shared with other stacks.
	pub fn from_shared(transform: Transform<O, I>) -> Self {
		Self { transform }
	}
}

impl<O, I> Interceptor<O, I> for WidenInterceptor<O, I>
where
	O: 'static,
	I: 'static,
{
	fn around_receive(
		&self,
		ctx: &mut ActorContext,
		message: &O,
		target: ReceiveTarget<'_, I>,
	) -> BehaviorResult<I> {
		// the transform would rewrap the timer and break its key and generation check
		if let Some(timer) = as_timer(message) {
			return Err(BehaviorError::ReservedMessage(format!(
				"timers and message transforms cannot be combined, timer [{}]",
				timer.key
			)));
		}

		match (self.transform)(message) {
			Some(inner) => target.receive(ctx, &inner),
			None => Ok(Behavior::Unhandled),
		}
	}

	fn is_same(&self, other: &dyn Layer) -> Sameness {
		match other.transform_id() {
			Some(id) if id == TransformId::of(&self.transform) => Sameness::Same,
			Some(_) => Sameness::Incompatible(format!(
				"[{}] and [{}] both transform messages",
				Interceptor::<O, I>::name(self),
				other.interceptor_name()
			)),
			None => Sameness::Different,
		}
	}

	fn transform_id(&self) -> Option<TransformId> {
		Some(TransformId::of(&self.transform))
	}
}
