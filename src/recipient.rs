use std::fmt;

use tokio::sync::mpsc;

/// Handle used to send messages to another actor.
///
/// Sending never blocks, so it is safe from inside a synchronous dispatch. Two
/// handles are the same target when they feed the same channel.
pub struct ActorRef<M> {
	path: String,
	tx: mpsc::UnboundedSender<M>,
}

impl<M> Clone for ActorRef<M> {
	fn clone(&self) -> Self {
		Self {
			path: self.path.clone(),
			tx: self.tx.clone(),
		}
	}
}

impl<M> fmt::Debug for ActorRef<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActorRef").field("path", &self.path).finish()
	}
}

impl<M: Send + 'static> ActorRef<M> {
	/// Create a target and the receiving end of its channel.
	pub fn channel(path: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<M>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(
			Self {
				path: path.into(),
				tx,
			},
			rx,
		)
	}

	pub fn from_sender(path: impl Into<String>, tx: mpsc::UnboundedSender<M>) -> Self {
		Self {
			path: path.into(),
			tx,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	pub fn same_target(&self, other: &ActorRef<M>) -> bool {
		self.tx.same_channel(&other.tx)
	}

	/// Fire and forget. Messages to a closed target are dropped as dead letters.
	pub fn tell(&self, message: M) {
		if self.tx.send(message).is_err() {
			tracing::debug!(target_actor = %self.path, "Dead letter, target is closed");
		}
	}
}
