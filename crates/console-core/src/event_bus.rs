//! Event bus for change notifications to the presentation layer.
//!
//! A thin wrapper over a broadcast channel. Publishing never blocks
//! and never fails: with no subscriber attached the event is simply
//! dropped, and a lagging subscriber loses the oldest events rather
//! than stalling the engine.

use console_types::ConsoleEvent;
use tokio::sync::broadcast;

/// Default capacity of the event channel.
const DEFAULT_CAPACITY: usize = 128;

/// Broadcast bus for engine change events.
#[derive(Debug, Clone)]
pub struct EventBus {
	sender: broadcast::Sender<ConsoleEvent>,
}

impl EventBus {
	/// Creates a new event bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Subscribes to all events published after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	pub fn publish(&self, event: ConsoleEvent) {
		// An Err here only means nobody is listening right now.
		let _ = self.sender.send(event);
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_subscriber_receives_published_events() {
		let bus = EventBus::default();
		let mut receiver = bus.subscribe();

		bus.publish(ConsoleEvent::SelectionChanged { selected: 2 });
		match receiver.recv().await.unwrap() {
			ConsoleEvent::SelectionChanged { selected } => assert_eq!(selected, 2),
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn test_publish_without_subscribers_is_fine() {
		let bus = EventBus::default();
		bus.publish(ConsoleEvent::RowsChanged { rows: 0 });
	}
}
