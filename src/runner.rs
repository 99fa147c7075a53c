use crate::behavior::Behavior;
use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;
use crate::interceptor::NestedSlot;
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerState {
	Running,
	Stopped,
}

/// Drives the behavior of a single actor, one message or signal at a time.
///
/// Failures are returned to the caller with the actor still running; deciding
/// whether to resume, restart or stop belongs to the supervisor.
pub struct BehaviorRunner<M: 'static> {
	ctx: ActorContext,
	slot: NestedSlot<M>,
	state: RunnerState,
}

impl<M: 'static> BehaviorRunner<M> {
	pub fn start(initial: Behavior<M>, mut ctx: ActorContext) -> Result<Self, BehaviorError> {
		let started = initial.start(&mut ctx)?;
		if started.is_same() || started.is_unhandled() {
			return Err(BehaviorError::IllegalState("an actor cannot start as a marker"));
		}

		let mut runner = Self {
			ctx,
			slot: NestedSlot::vacant(),
			state: RunnerState::Running,
		};
		let outcome = runner.slot.install(started, &mut runner.ctx)?;
		runner.apply(outcome)?;
		tracing::debug!(actor = runner.ctx.path(), "Actor started");
		Ok(runner)
	}

	pub fn tell(&mut self, message: &M) -> Result<(), BehaviorError> {
		self.ensure_running()?;
		let next = self.slot.committed_mut().interpret_message(&mut self.ctx, message);
		let next = self.advance(next)?;
		if next.is_unhandled() {
			tracing::debug!(actor = self.ctx.path(), "Message was not handled");
		}
		self.apply(next)
	}

	pub fn signal(&mut self, signal: &Signal) -> Result<(), BehaviorError> {
		self.ensure_running()?;
		let next = self.slot.committed_mut().interpret_signal(&mut self.ctx, signal);
		let next = self.advance(next)?;
		self.apply(next)
	}

	/// Stop the actor from the outside. The behavior sees `PostStop`.
	pub fn stop(&mut self) {
		if self.state == RunnerState::Running {
			self.post_stop();
		}
	}

	pub fn is_alive(&self) -> bool {
		self.state == RunnerState::Running
	}

	pub fn behavior(&self) -> &Behavior<M> {
		self.slot.committed()
	}

	/// Interceptor frames currently stacked on the actor's behavior.
	pub fn stack_depth(&self) -> Result<usize, BehaviorError> {
		self.slot.committed().stack_depth()
	}

	pub fn context(&self) -> &ActorContext {
		&self.ctx
	}

	pub fn context_mut(&mut self) -> &mut ActorContext {
		&mut self.ctx
	}

	fn ensure_running(&self) -> Result<(), BehaviorError> {
		match self.state {
			RunnerState::Running => Ok(()),
			RunnerState::Stopped => Err(BehaviorError::Stopped),
		}
	}

	fn advance(&mut self, next: BehaviorResult<M>) -> BehaviorResult<M> {
		self.slot.advance(next?, &mut self.ctx)
	}

	fn apply(&mut self, next: Behavior<M>) -> Result<(), BehaviorError> {
		match next {
			Behavior::Same | Behavior::Unhandled => Ok(()),
			Behavior::Stopped => {
				self.post_stop();
				Ok(())
			}
			other => {
				let installed = self.slot.install(other, &mut self.ctx)?;
				if !installed.is_alive() {
					self.post_stop();
				}
				Ok(())
			}
		}
	}

	fn post_stop(&mut self) {
		self.state = RunnerState::Stopped;
		if let Err(err) = self.slot.committed_mut().interpret_signal(&mut self.ctx, &Signal::PostStop) {
			tracing::warn!(actor = self.ctx.path(), error = %err, "PostStop handler failed");
		}
		tracing::debug!(actor = self.ctx.path(), "Actor stopped");
	}
}
