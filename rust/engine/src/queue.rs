//! Lock-free single-producer/single-consumer event queue.
//!
//! The producer side is driven by whatever thread decodes MIDI bytes or OSC
//! packets; the consumer side is driven exclusively by the audio thread
//! inside [`crate::dispatcher::InputDispatcher::process`]. Neither side
//! blocks, allocates, or takes a lock - a full queue silently drops the
//! newest event, and an empty queue yields [`Event::NULL`].

use crate::event::Event;
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// The producer half of an [`EventQueue`]. Cheap to send to a non-audio
/// thread; `push` never blocks.
pub struct EventProducer {
    inner: HeapProducer<Event>,
}

impl EventProducer {
    /// Enqueues `event`. If the queue is full, the event is dropped and
    /// `false` is returned; callers on the hot path are not expected to
    /// act on this, but tests and diagnostics may want to know.
    pub fn push(&mut self, event: Event) -> bool {
        if self.inner.push(event).is_err() {
            log::trace!("conformal_poly_input: event queue full, dropping event");
            false
        } else {
            true
        }
    }
}

/// The consumer half of an [`EventQueue`], owned by the audio thread.
pub struct EventConsumer {
    inner: HeapConsumer<Event>,
}

impl EventConsumer {
    /// Pops the next event, or [`Event::NULL`] if the queue is empty.
    #[must_use]
    pub fn pop(&mut self) -> Event {
        self.inner.pop().unwrap_or(Event::NULL)
    }

    /// Drains every pending event, calling `f` for each in FIFO order.
    ///
    /// Events are *not* reordered by [`Event::time`](Event::time): this
    /// mirrors the dispatch order guarantee in the surrounding engine,
    /// which applies events in the order they were enqueued.
    pub fn drain(&mut self, mut f: impl FnMut(Event)) {
        loop {
            let event = self.pop();
            if event.is_null() {
                break;
            }
            f(event);
        }
    }
}

/// Constructs a fresh lock-free queue split into its producer and consumer
/// halves. `capacity` should be a power of two; non-power-of-two capacities
/// still work but waste a little headroom.
#[must_use]
pub fn event_queue(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<Event>::new(capacity);
    let (producer, consumer) = rb.split();
    (
        EventProducer { inner: producer },
        EventConsumer { inner: consumer },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_is_preserved() {
        let (mut tx, mut rx) = event_queue(4);
        tx.push(Event::note_on(1, 60, 0, 60.0, 0.5));
        tx.push(Event::note_on(1, 61, 1, 61.0, 0.5));
        let first = rx.pop();
        let second = rx.pop();
        assert_eq!(first.creator_id, 60);
        assert_eq!(second.creator_id, 61);
        assert!(rx.pop().is_null());
    }

    #[test]
    fn overflow_drops_newest_and_never_panics() {
        let (mut tx, mut rx) = event_queue(2);
        assert!(tx.push(Event::note_on(1, 1, 0, 60.0, 0.5)));
        assert!(tx.push(Event::note_on(1, 2, 0, 61.0, 0.5)));
        assert!(!tx.push(Event::note_on(1, 3, 0, 62.0, 0.5)));
        assert_eq!(rx.pop().creator_id, 1);
        assert_eq!(rx.pop().creator_id, 2);
        assert!(rx.pop().is_null());
    }

    #[test]
    fn drain_visits_every_pending_event_in_order() {
        let (mut tx, mut rx) = event_queue(8);
        for id in 0..5u32 {
            tx.push(Event::note_on(1, id, 0, 60.0, 0.5));
        }
        let mut seen = Vec::new();
        rx.drain(|e| seen.push(e.creator_id));
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }
}
