mod behavior;
mod behaviors;
mod context;
mod error;
mod frame;
mod interceptor;
mod log_messages;
mod message;
mod monitor;
mod recipient;
mod runner;
mod signal;
mod stash;
mod widen;
pub mod census;

pub mod prelude {
	pub use super::behavior::Behavior;
	pub use super::behaviors::Behaviors;
	pub use super::context::ActorContext;
	pub use super::error::BehaviorError;
	pub use super::error::BehaviorResult;
	pub use super::interceptor::Interceptor;
	pub use super::runner::BehaviorRunner;
	pub use super::signal::Signal;
}

pub use behavior::Behavior;
pub use behavior::DeferredFactory;
pub use behavior::ExtensibleBehavior;
pub use behavior::Layer;
pub use behavior::MAX_STACK_DEPTH;
pub use behaviors::Behaviors;
pub use behaviors::Receive;
pub use context::ActorContext;
pub use context::LogRecord;
pub use context::LogSink;
pub use context::TracingSink;
pub use error::BehaviorError;
pub use error::BehaviorResult;
pub use frame::InterceptorFrame;
pub use frame::intercept;
pub use interceptor::Interceptor;
pub use interceptor::ReceiveTarget;
pub use interceptor::Sameness;
pub use interceptor::SignalTarget;
pub use interceptor::StartTarget;
pub use interceptor::TransformId;
pub use log_messages::LogMessagesInterceptor;
pub use log_messages::LogOptions;
pub use message::AnyMessage;
pub use message::MessageFilter;
pub use message::TimerMessage;
pub use message::narrow;
pub use message::runtime_view;
pub use monitor::MonitorInterceptor;
pub use recipient::ActorRef;
pub use runner::BehaviorRunner;
pub use signal::Signal;
pub use stash::StashBuffer;
pub use stash::UnstashingBehavior;
pub use widen::Transform;
pub use widen::WidenInterceptor;
