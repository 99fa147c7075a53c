mod common;

use std::sync::Arc;

use common::Cmd;
use common::RecordingSink;
use common::context;
use common::counter;
use common::drain;
use proptest::prelude::*;
use runy_behavior::ActorContext;
use runy_behavior::ActorRef;
use runy_behavior::AnyMessage;
use runy_behavior::Behavior;
use runy_behavior::BehaviorError;
use runy_behavior::BehaviorRunner;
use runy_behavior::Behaviors;
use runy_behavior::LogOptions;
use runy_behavior::Signal;
use runy_behavior::TimerMessage;
use runy_behavior::Transform;
use runy_behavior::WidenInterceptor;
use tracing::Level;

fn recorder(sink: ActorRef<u32>) -> Behavior<u32> {
	Behaviors::receive_message(move |_ctx, n: &u32| {
		sink.tell(*n);
		Ok(Behaviors::same())
	})
}

fn logged_context(sink: &Arc<RecordingSink>) -> ActorContext {
	ActorContext::with_sink("/user/counter", sink.clone())
}

#[test]
fn test_logger_scenario_with_monitor() {
	let sink = Arc::new(RecordingSink::default());
	let (monitor, mut monitored) = ActorRef::channel("/user/monitor");
	let (reporter, mut values) = ActorRef::channel("/user/values");
	let behavior = Behaviors::log_messages(Behaviors::monitor(monitor, counter(0, reporter)));

	let mut runner = BehaviorRunner::start(behavior, logged_context(&sink)).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 2);

	runner.tell(&Cmd::Inc(1)).unwrap();
	assert_eq!(sink.records(), vec!["actor [/user/counter] received message: Inc(1)".to_string()]);
	assert_eq!(drain(&mut monitored), vec![Cmd::Inc(1)]);

	runner.tell(&Cmd::Get).unwrap();
	assert_eq!(drain(&mut values), vec![1]);
	assert_eq!(runner.stack_depth().unwrap(), 2);
}

#[test]
fn test_disabled_logger_stays_silent() {
	let sink = Arc::new(RecordingSink::default());
	let (reporter, _values) = ActorRef::channel("/user/values");
	let options = LogOptions::new().with_enabled(false);
	let behavior = Behaviors::log_messages_with(options, counter(0, reporter));

	let mut runner = BehaviorRunner::start(behavior, logged_context(&sink)).unwrap();
	runner.tell(&Cmd::Inc(1)).unwrap();
	runner.tell(&Cmd::Get).unwrap();
	runner.signal(&Signal::PreRestart).unwrap();

	assert_eq!(sink.count(), 0);
}

#[test]
fn test_enabled_logger_logs_messages_and_signals() {
	let sink = Arc::new(RecordingSink::default());
	let (reporter, _values) = ActorRef::channel("/user/values");
	let behavior = Behaviors::log_messages(counter(0, reporter));

	let mut runner = BehaviorRunner::start(behavior, logged_context(&sink)).unwrap();
	runner.tell(&Cmd::Inc(1)).unwrap();
	runner.tell(&Cmd::Get).unwrap();
	runner.signal(&Signal::Terminated { actor: "/user/child".into() }).unwrap();
	runner
		.signal(&Signal::ChildFailed {
			actor: "/user/child".into(),
			reason: "boom".into(),
		})
		.unwrap();

	let records = sink.records();
	assert_eq!(records.len(), 4);
	assert!(records[2].starts_with("actor [/user/counter] received signal: Terminated"));
	assert!(records[3].contains("ChildFailed"));
	assert!(records[3].contains("boom"));
}

#[test]
fn test_logger_prefers_configured_sink() {
	let configured = Arc::new(RecordingSink::default());
	let ambient = Arc::new(RecordingSink::default());
	let (reporter, _values) = ActorRef::channel("/user/values");
	let options = LogOptions::new().with_level(Level::INFO).with_sink(configured.clone());
	let behavior = Behaviors::log_messages_with(options, counter(0, reporter));

	let mut runner = BehaviorRunner::start(behavior, logged_context(&ambient)).unwrap();
	runner.tell(&Cmd::Inc(3)).unwrap();

	assert_eq!(configured.count(), 1);
	assert_eq!(ambient.count(), 0);
}

#[test]
fn test_equal_logger_options_flatten() {
	let (reporter, _values) = ActorRef::channel("/user/values");
	let behavior = Behaviors::log_messages(Behaviors::log_messages(counter(0, reporter.clone())));
	let runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 1);

	let quiet = LogOptions::new().with_level(Level::TRACE);
	let behavior = Behaviors::log_messages(Behaviors::log_messages_with(quiet, counter(0, reporter)));
	let runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 2);
}

#[test]
fn test_monitor_same_target_once() {
	let (monitor, mut monitored) = ActorRef::channel("/user/monitor");
	let (reporter, _values) = ActorRef::channel("/user/values");
	let behavior = Behaviors::monitor(monitor.clone(), Behaviors::monitor(monitor, counter(0, reporter)));

	let mut runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 1);

	runner.tell(&Cmd::Inc(4)).unwrap();
	assert_eq!(drain(&mut monitored), vec![Cmd::Inc(4)]);
}

#[test]
fn test_monitor_different_targets_stack() {
	let (first, mut first_seen) = ActorRef::channel("/user/first");
	let (second, mut second_seen) = ActorRef::channel("/user/second");
	let (reporter, _values) = ActorRef::channel("/user/values");
	let behavior = Behaviors::monitor(first, Behaviors::monitor(second, counter(0, reporter)));

	let mut runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 2);

	runner.tell(&Cmd::Get).unwrap();
	assert_eq!(drain(&mut first_seen), vec![Cmd::Get]);
	assert_eq!(drain(&mut second_seen), vec![Cmd::Get]);
}

#[tokio::test]
async fn test_monitor_feeds_a_running_consumer() {
	let (monitor, mut rx) = ActorRef::channel("/user/monitor");
	let consumer = tokio::spawn(async move {
		let mut seen = Vec::new();
		while let Some(cmd) = rx.recv().await {
			seen.push(cmd);
		}
		seen
	});

	let (reporter, _values) = ActorRef::channel("/user/values");
	let mut runner = BehaviorRunner::start(Behaviors::monitor(monitor, counter(0, reporter)), context()).unwrap();
	for n in 0..10 {
		runner.tell(&Cmd::Inc(n)).unwrap();
	}
	drop(runner);

	let seen = consumer.await.unwrap();
	assert_eq!(seen, (0..10).map(Cmd::Inc).collect::<Vec<_>>());
}

fn parse_strings(message: &AnyMessage) -> Option<u32> {
	message.downcast_ref::<String>().and_then(|text| text.parse().ok())
}

#[test]
fn test_widen_declines_and_delegates() {
	let (sink, mut received) = ActorRef::channel("/user/sink");
	let mut ctx = context();
	let mut behavior = Behaviors::widen(parse_strings, recorder(sink)).start(&mut ctx).unwrap();

	let declined = behavior
		.interpret_message(&mut ctx, &AnyMessage::new("not a number".to_string()))
		.unwrap();
	assert!(declined.is_unhandled());

	let declined = behavior.interpret_message(&mut ctx, &AnyMessage::new(5u32)).unwrap();
	assert!(declined.is_unhandled());

	let handled = behavior
		.interpret_message(&mut ctx, &AnyMessage::new("12".to_string()))
		.unwrap();
	assert!(handled.is_same());
	assert_eq!(drain(&mut received), vec![12]);
}

#[test]
fn test_widen_rejects_timer_messages() {
	let (sink, mut received) = ActorRef::channel("/user/sink");
	let mut runner = BehaviorRunner::start(Behaviors::widen(parse_strings, recorder(sink)), context()).unwrap();

	let err = runner
		.tell(&AnyMessage::new(TimerMessage::new("tick", 1)))
		.unwrap_err();
	assert!(matches!(err, BehaviorError::ReservedMessage(_)));
	assert!(err.is_fatal());
	assert!(drain(&mut received).is_empty());
}

#[test]
fn test_two_transforms_cannot_share_a_stack() {
	let (sink, _received) = ActorRef::channel("/user/sink");
	let behavior: Behavior<AnyMessage> = Behaviors::widen(
		|message: &AnyMessage| message.downcast_ref::<String>().cloned(),
		Behaviors::widen(|text: &String| text.parse::<u32>().ok(), recorder(sink)),
	);

	let err = BehaviorRunner::start(behavior, context()).err().unwrap();
	assert!(matches!(err, BehaviorError::IncompatibleInterceptors(_)));
	assert!(err.is_fatal());
}

#[test]
fn test_shared_transform_flattens() {
	let (sink, mut received) = ActorRef::channel("/user/sink");
	let double: Transform<u32, u32> = Arc::new(|n: &u32| Some(n * 2));
	let behavior = Behaviors::transform_messages(
		Arc::new(WidenInterceptor::from_shared(double.clone())),
		Behaviors::transform_messages(Arc::new(WidenInterceptor::from_shared(double)), recorder(sink)),
	);

	let mut runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 1);

	runner.tell(&3).unwrap();
	assert_eq!(drain(&mut received), vec![6]);
}

#[test]
fn test_widen_over_monitor_stacks() {
	let (monitor, mut monitored) = ActorRef::channel("/user/monitor");
	let (sink, mut received) = ActorRef::channel("/user/sink");
	let behavior = Behaviors::widen(parse_strings, Behaviors::monitor(monitor, recorder(sink)));

	let mut runner = BehaviorRunner::start(behavior, context()).unwrap();
	assert_eq!(runner.stack_depth().unwrap(), 2);

	runner.tell(&AnyMessage::new("8".to_string())).unwrap();
	assert_eq!(drain(&mut monitored), vec![8]);
	assert_eq!(drain(&mut received), vec![8]);
}

proptest! {
	#[test]
	fn prop_monitor_forwards_in_order(values in proptest::collection::vec(-1000i64..1000, 0..64)) {
		let (monitor, mut monitored) = ActorRef::channel("/user/monitor");
		let (reporter, mut totals) = ActorRef::channel("/user/values");
		let mut runner = BehaviorRunner::start(Behaviors::monitor(monitor, counter(0, reporter)), context()).unwrap();

		for value in &values {
			runner.tell(&Cmd::Inc(*value)).unwrap();
		}

		let expected: Vec<Cmd> = values.iter().copied().map(Cmd::Inc).collect();
		prop_assert_eq!(drain(&mut monitored), expected);

		runner.tell(&Cmd::Get).unwrap();
		prop_assert_eq!(drain(&mut totals), vec![values.iter().sum::<i64>()]);
	}
}
