use std::any::type_name;

#[derive(thiserror::Error, Debug)]
pub enum BehaviorError {
	#[error("Behavior failed: {0}")]
	Failed(#[from] anyhow::Error),

	#[error("Message of type `{outer}` cannot be delivered as `{inner}`")]
	BoundaryViolation {
		outer: &'static str,
		inner: &'static str,
	},

	#[error("Incompatible interceptors in one behavior stack: {0}")]
	IncompatibleInterceptors(String),

	#[error("Reserved message cannot be intercepted: {0}")]
	ReservedMessage(String),

	#[error("Illegal behavior state: {0}")]
	IllegalState(&'static str),

	#[error("Behavior stack is deeper than {0} frames")]
	StackTooDeep(usize),

	#[error("Stash buffer is full (capacity {0})")]
	StashOverflow(usize),

	#[error("Actor is already stopped")]
	Stopped,
}

impl BehaviorError {
	pub(crate) fn boundary<O, I>() -> Self {
		BehaviorError::BoundaryViolation {
			outer: type_name::<O>(),
			inner: type_name::<I>(),
		}
	}

	/// Configuration errors signal a programming mistake rather than a runtime condition.
	pub fn is_fatal(&self) -> bool {
		matches!(
			self,
			BehaviorError::BoundaryViolation { .. }
				| BehaviorError::IncompatibleInterceptors(_)
				| BehaviorError::ReservedMessage(_)
		)
	}
}

pub type BehaviorResult<M> = Result<crate::Behavior<M>, BehaviorError>;
