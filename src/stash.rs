use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::behavior::Behavior;
use crate::context::ActorContext;
use crate::error::BehaviorError;
use crate::error::BehaviorResult;

/// A behavior in the middle of replaying buffered messages.
pub trait UnstashingBehavior<M>: Send {
	/// The behavior reached by the messages replayed so far.
	fn current_behavior(&self) -> &Behavior<M>;

	fn into_current_behavior(self: Box<Self>) -> Behavior<M>;

	/// Replay buffered messages, starting from `previous` when no explicit target
	/// behavior was given. Returns the behavior to install once the replay is done.
	///
	/// On failure `current_behavior` still holds everything committed before the
	/// failing message. When the replay stops the actor the result is `Stopped` and
	/// `current_behavior` is the last live behavior.
	fn unstash(&mut self, previous: Behavior<M>, ctx: &mut ActorContext) -> BehaviorResult<M>;
}

/// Bounded buffer of messages put aside until the actor is ready for them.
///
/// Clones share the same buffer, which lets an unstashing behavior leave unreplayed
/// messages behind when a replay fails.
pub struct StashBuffer<M> {
	messages: Arc<Mutex<VecDeque<M>>>,
	capacity: usize,
}

impl<M> Clone for StashBuffer<M> {
	fn clone(&self) -> Self {
		Self {
			messages: self.messages.clone(),
			capacity: self.capacity,
		}
	}
}

impl<M> fmt::Debug for StashBuffer<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StashBuffer")
			.field("len", &self.len())
			.field("capacity", &self.capacity)
			.finish()
	}
}

impl<M> StashBuffer<M> {
	pub fn new(capacity: usize) -> Self {
		Self {
			messages: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.messages.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.lock().is_empty()
	}

	pub fn is_full(&self) -> bool {
		self.len() >= self.capacity
	}

	pub fn stash(&self, message: M) -> Result<(), BehaviorError> {
		let mut messages = self.messages.lock();
		if messages.len() >= self.capacity {
			return Err(BehaviorError::StashOverflow(self.capacity));
		}
		messages.push_back(message);
		Ok(())
	}

	fn pop(&self) -> Option<M> {
		self.messages.lock().pop_front()
	}
}

impl<M: Send + 'static> StashBuffer<M> {
	/// Replay every buffered message into `target`. Pass `Behavior::Same` to replay into
	/// the behavior that was installed when the replay starts.
	pub fn unstash_all(&self, target: Behavior<M>) -> Behavior<M> {
		self.unstash(target, self.len())
	}

	/// Replay at most `count` buffered messages into `target`.
	pub fn unstash(&self, target: Behavior<M>, count: usize) -> Behavior<M> {
		Behavior::Unstashing(Box::new(Unstash {
			buffer: self.clone(),
			current: target,
			remaining: count,
		}))
	}
}

struct Unstash<M> {
	buffer: StashBuffer<M>,
	current: Behavior<M>,
	remaining: usize,
}

impl<M: Send + 'static> UnstashingBehavior<M> for Unstash<M> {
	fn current_behavior(&self) -> &Behavior<M> {
		&self.current
	}

	fn into_current_behavior(self: Box<Self>) -> Behavior<M> {
		self.current
	}

	fn unstash(&mut self, previous: Behavior<M>, ctx: &mut ActorContext) -> BehaviorResult<M> {
		// `current` holds the previous behavior until an explicit target has started
		let target = match mem::replace(&mut self.current, Behavior::Same) {
			Behavior::Same | Behavior::Unhandled => previous,
			explicit => {
				self.current = previous;
				explicit
			}
		};
		let started = target.start(ctx)?;
		if !started.is_alive() {
			return Ok(Behavior::Stopped);
		}
		self.current = started;

		while self.remaining > 0 {
			let Some(message) = self.buffer.pop() else {
				break;
			};
			self.remaining -= 1;

			match self.current.interpret_message(ctx, &message)?.canonicalize(ctx)? {
				Behavior::Same => {}
				Behavior::Unhandled => {
					tracing::debug!(actor = ctx.path(), "Unstashed message was not handled");
				}
				// the stopping behavior stays current so it still sees PostStop
				Behavior::Stopped => return Ok(Behavior::Stopped),
				Behavior::Unstashing(_) => {
					return Err(BehaviorError::IllegalState(
						"a replayed message cannot start another replay",
					));
				}
				next => self.current = next,
			}
		}

		Ok(mem::replace(&mut self.current, Behavior::Same))
	}
}
