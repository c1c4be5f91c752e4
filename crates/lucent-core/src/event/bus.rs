// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A thread-safe channel used to mirror window events to observers living on
/// other threads.
///
/// The window thread only ever holds a [`flume::Sender`] obtained through
/// [`EventBus::sender`]; the bus itself stays with the observer.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Creates a new EventBus backed by an unbounded channel.
    ///
    /// ## Returns
    /// A new instance of the EventBus struct.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus initialized.");
        Self { sender, receiver }
    }

    /// Sends an event, logging a warning if every receiver is gone.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    ///
    /// ## Returns
    /// `true` if the event was queued.
    pub fn publish(&self, event: T) -> bool {
        log::trace!("Publishing an event.");

        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to publish event: {e}.");
                false
            }
        }
    }

    /// Returns a clone of the sender end of the channel, to be moved to the
    /// window thread.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Takes every event queued so far without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PointerEvent, PointerKind, PointerSource, Point, TypedEvent};
    use crate::platform::WindowStage;
    use flume::TryRecvError;
    use std::{thread, time::Duration};

    fn pointer_move(x: f32, y: f32) -> TypedEvent {
        TypedEvent::Pointer(PointerEvent {
            kind: PointerKind::Move,
            source: PointerSource::Mouse,
            position: Point::new(x, y),
            scroll: None,
            time: Duration::from_millis(5),
        })
    }

    #[test]
    fn empty_bus_has_nothing_to_receive() {
        let bus = EventBus::<TypedEvent>::new();

        match bus.receiver().try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(event) => panic!("Received unexpected event: {event:?}"),
            Err(e) => panic!("Received unexpected error: {e:?}"),
        }
    }

    #[test]
    fn published_events_keep_their_order() {
        let bus = EventBus::<TypedEvent>::new();

        assert!(bus.publish(TypedEvent::stage(WindowStage::Running)));
        assert!(bus.publish(pointer_move(1.0, 2.0)));
        assert!(bus.publish(TypedEvent::CloseRequest));

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                TypedEvent::stage(WindowStage::Running),
                pointer_move(1.0, 2.0),
                TypedEvent::CloseRequest,
            ]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn events_sent_from_window_thread_are_observed() {
        let bus = EventBus::<TypedEvent>::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender
                .send(TypedEvent::CloseRequest)
                .expect("Send from thread failed");
        });

        match bus.receiver().recv_timeout(Duration::from_secs(1)) {
            Ok(event) => assert_eq!(event, TypedEvent::CloseRequest),
            Err(e) => panic!("Failed to receive event from thread: {e:?}"),
        }

        handle.join().expect("Thread join failed");
    }

    #[test]
    fn sender_fails_once_bus_is_dropped() {
        let bus = EventBus::<TypedEvent>::new();
        let sender = bus.sender();
        drop(bus);

        assert!(sender.send(TypedEvent::CloseRequest).is_err());
    }
}
