/// Lifecycle notifications delivered to behaviors alongside ordinary messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
	/// The actor is about to be restarted by its supervisor.
	PreRestart,
	/// The actor has stopped; this is the last thing its behavior sees.
	PostStop,
	/// A watched actor terminated.
	Terminated { actor: String },
	/// A child actor failed.
	ChildFailed { actor: String, reason: String },
}
