//! Event queue - time-ordered scheduling
//!
//! A binary min-heap of events keyed by `(time, seq)`, where `seq` is the
//! order in which events were pushed. Events with equal time therefore pop
//! in FIFO order, so a run is fully deterministic.
//!
//! `seq` restarts at zero on `clear()`, which makes two freshly seeded
//! queues identical when they are seeded the same way.

use crate::core::time::SimTime;
use crate::events::types::Event;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An event plus its scheduling sequence number
#[derive(Debug, Clone, Copy)]
struct Queued {
    seq: u64,
    event: Event,
}

impl Queued {
    fn key(&self) -> (SimTime, u64) {
        (self.event.time(), self.seq)
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-priority queue of scheduled events
///
/// # Example
/// ```
/// use er_triage_core_rs::events::{Event, EventQueue};
/// use er_triage_core_rs::{PatientId, SimTime};
///
/// let mut queue = EventQueue::new();
/// queue.push(Event::poll(SimTime::from_hm(8, 5)));
/// queue.push(Event::arrival(SimTime::from_hm(8, 0), PatientId::new(1)));
///
/// assert_eq!(queue.pop().unwrap().time(), SimTime::from_hm(8, 0));
/// assert_eq!(queue.pop().unwrap().time(), SimTime::from_hm(8, 5));
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Queued>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event: O(log n)
    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Queued { seq, event }));
    }

    /// Remove the earliest event (FIFO among equal times): O(log n)
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(queued)| queued.event)
    }

    /// Time of the next event without removing it
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(queued)| queued.event.time())
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// All pending events in the order they would pop
    ///
    /// O(n log n); intended for inspection, not for the hot loop.
    pub fn ordered(&self) -> Vec<Event> {
        let mut queued: Vec<Queued> = self.heap.iter().map(|Reverse(q)| *q).collect();
        queued.sort();
        queued.into_iter().map(|q| q.event).collect()
    }

    /// Drop every pending event and restart the sequence
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::EventKind;
    use crate::models::patient::PatientId;

    #[test]
    fn test_equal_times_pop_fifo() {
        let t = SimTime::from_hm(12, 0);
        let mut queue = EventQueue::new();
        queue.push(Event::treated(t, PatientId::new(1)));
        queue.push(Event::poll(t));
        queue.push(Event::visit(t));

        let kinds: Vec<EventKind> = std::iter::from_fn(|| queue.pop()).map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Treated, EventKind::Poll, EventKind::Visit]);
    }

    #[test]
    fn test_ordered_matches_pop_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::poll(SimTime::from_minutes(30)));
        queue.push(Event::visit(SimTime::from_minutes(10)));
        queue.push(Event::poll(SimTime::from_minutes(10)));
        queue.push(Event::visit(SimTime::from_minutes(20)));

        let snapshot = queue.ordered();
        assert_eq!(snapshot.len(), queue.len());

        let popped: Vec<Event> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(snapshot, popped);
    }

    #[test]
    fn test_clear_restarts_sequence() {
        let mut queue = EventQueue::new();
        queue.push(Event::poll(SimTime::from_minutes(5)));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_time(), None);
        assert_eq!(queue.next_seq, 0);
    }
}
