#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use runy_behavior::ActorContext;
use runy_behavior::ActorRef;
use runy_behavior::Behavior;
use runy_behavior::BehaviorResult;
use runy_behavior::Behaviors;
use runy_behavior::Interceptor;
use runy_behavior::LogRecord;
use runy_behavior::LogSink;
use runy_behavior::ReceiveTarget;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
	Inc(i64),
	Get,
	Stop,
}

/// Counter that reports its value to `reporter` on `Get`.
pub fn counter(value: i64, reporter: ActorRef<i64>) -> Behavior<Cmd> {
	Behaviors::receive(
		move |_ctx, cmd: &Cmd| match cmd {
			Cmd::Inc(n) => Ok(counter(value + n, reporter.clone())),
			Cmd::Get => {
				reporter.tell(value);
				Ok(Behaviors::same())
			}
			Cmd::Stop => Ok(Behaviors::stopped()),
		},
		|_ctx, _signal| Ok(Behaviors::same()),
	)
}

pub fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
	let mut out = Vec::new();
	while let Ok(value) = rx.try_recv() {
		out.push(value);
	}
	out
}

pub fn context() -> ActorContext {
	ActorContext::new("/user/test")
}

#[derive(Default)]
pub struct RecordingSink {
	records: Mutex<Vec<String>>,
}

impl RecordingSink {
	pub fn count(&self) -> usize {
		self.records.lock().len()
	}

	pub fn records(&self) -> Vec<String> {
		self.records.lock().clone()
	}
}

impl LogSink for RecordingSink {
	fn log(&self, record: &LogRecord<'_>) {
		self.records.lock().push(record.message.to_string());
	}
}

/// Counts hook invocations and otherwise passes messages through.
#[derive(Default)]
pub struct Passthrough {
	pub receives: AtomicUsize,
}

impl Passthrough {
	pub fn receives(&self) -> usize {
		self.receives.load(Ordering::SeqCst)
	}
}

impl<M: 'static> Interceptor<M, M> for Passthrough {
	fn around_receive(
		&self,
		ctx: &mut ActorContext,
		message: &M,
		target: ReceiveTarget<'_, M>,
	) -> BehaviorResult<M> {
		self.receives.fetch_add(1, Ordering::SeqCst);
		target.receive(ctx, message)
	}
}
