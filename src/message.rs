use std::any::Any;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::error::BehaviorError;

/// A type-erased message that remembers the name of its runtime type.
///
/// Outer layers of a stack that accept "anything" use `AnyMessage` as their message
/// type; the runtime type of the payload decides which filters match and whether
/// the message can be narrowed to an inner type.
#[derive(Clone)]
pub struct AnyMessage {
	payload: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
}

impl AnyMessage {
	pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
		Self {
			payload: Arc::new(value),
			type_name: type_name::<T>(),
		}
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn is<T: 'static>(&self) -> bool {
		self.payload.is::<T>()
	}

	pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
		self.payload.downcast_ref::<T>()
	}

	pub fn payload(&self) -> &(dyn Any + Send + Sync) {
		self.payload.as_ref()
	}
}

impl fmt::Debug for AnyMessage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "AnyMessage<{}>", self.type_name)
	}
}

/// Runtime view of a message: an [`AnyMessage`] is seen through its payload,
/// anything else is its own runtime type.
pub fn runtime_view<O: 'static>(message: &O) -> &dyn Any {
	let any = message as &dyn Any;
	match any.downcast_ref::<AnyMessage>() {
		Some(erased) => erased.payload(),
		None => any,
	}
}

/// Checked narrowing from an outer message type to an inner one.
pub fn narrow<O: 'static, I: 'static>(message: &O) -> Result<&I, BehaviorError> {
	if let Some(same) = (message as &dyn Any).downcast_ref::<I>() {
		return Ok(same);
	}
	runtime_view(message)
		.downcast_ref::<I>()
		.ok_or_else(BehaviorError::boundary::<O, I>)
}

/// Decides which messages an interceptor wants to see.
///
/// Messages that do not pass the filter skip the interceptor and go straight to the
/// nested behavior.
pub struct MessageFilter<O> {
	name: &'static str,
	accepts: Arc<dyn Fn(&O) -> bool + Send + Sync>,
}

impl<O> Clone for MessageFilter<O> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			accepts: self.accepts.clone(),
		}
	}
}

impl<O> fmt::Debug for MessageFilter<O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("MessageFilter").field(&self.name).finish()
	}
}

impl<O: 'static> MessageFilter<O> {
	/// Accept messages whose runtime type is `T`.
	pub fn of_type<T: 'static>() -> Self {
		Self {
			name: type_name::<T>(),
			accepts: Arc::new(|message: &O| runtime_view(message).is::<T>()),
		}
	}

	pub fn matching<F>(name: &'static str, predicate: F) -> Self
	where
		F: Fn(&O) -> bool + Send + Sync + 'static,
	{
		Self {
			name,
			accepts: Arc::new(predicate),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn accepts(&self, message: &O) -> bool {
		(self.accepts)(message)
	}
}

/// Reserved message kind used by actor timers.
///
/// Timer delivery relies on the key and generation arriving untouched, so these
/// messages must never be rewritten by a narrowing interceptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerMessage {
	pub key: String,
	pub generation: u64,
}

impl TimerMessage {
	pub fn new(key: impl Into<String>, generation: u64) -> Self {
		Self {
			key: key.into(),
			generation,
		}
	}
}

pub(crate) fn as_timer<O: 'static>(message: &O) -> Option<&TimerMessage> {
	runtime_view(message).downcast_ref::<TimerMessage>()
}
