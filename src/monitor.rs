use crate::behavior::Layer;
use crate::context::ActorContext;
use crate::error::BehaviorResult;
use crate::interceptor::Interceptor;
use crate::interceptor::ReceiveTarget;
use crate::interceptor::Sameness;
use crate::recipient::ActorRef;

/// Sends a copy of every message to a side target before the nested behavior sees it.
///
/// A stack monitors a given target at most once.
pub struct MonitorInterceptor<M> {
	target: ActorRef<M>,
}

impl<M> MonitorInterceptor<M> {
	pub fn new(target: ActorRef<M>) -> Self {
		Self { target }
	}

	pub fn target(&self) -> &ActorRef<M> {
		&self.target
	}
}

impl<M> Interceptor<M, M> for MonitorInterceptor<M>
where
	M: Clone + Send + Sync + 'static,
{
	fn around_receive(
		&self,
		ctx: &mut ActorContext,
		message: &M,
		target: ReceiveTarget<'_, M>,
	) -> BehaviorResult<M> {
		self.target.tell(message.clone());
		target.receive(ctx, message)
	}

	fn is_same(&self, other: &dyn Layer) -> Sameness {
		match other.interceptor().downcast_ref::<MonitorInterceptor<M>>() {
			Some(other) if other.target.same_target(&self.target) => Sameness::Same,
			_ => Sameness::Different,
		}
	}
}
