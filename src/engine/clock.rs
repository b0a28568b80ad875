//! Simulated clock and time-ordered event queue.
//!
//! Time is kept in integer ticks of one hundredth of a minute, so the
//! two-decimal rounding used throughout the plan is exact and time is
//! totally ordered. The queue dispatches events in `(time, scheduling
//! sequence)` order: equal-time events resume in the FIFO order they
//! were scheduled, which makes traces reproducible and machine-queue
//! fairness deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::TaskId;

/// Ticks per minute of simulated time.
const TICKS_PER_MINUTE: f64 = 100.0;

/// A point in simulated time, in hundredths of a minute.
///
/// Monotonically non-decreasing over a run; only the event loop
/// advances it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero (start of the simulated day).
    pub const ZERO: SimTime = SimTime(0);

    /// Converts minutes to simulated time, rounding to the nearest
    /// hundredth of a minute. Negative inputs clamp to zero.
    pub fn from_minutes(minutes: f64) -> Self {
        Self((minutes.max(0.0) * TICKS_PER_MINUTE).round() as u64)
    }

    /// This time as fractional minutes.
    pub fn as_minutes(self) -> f64 {
        self.0 as f64 / TICKS_PER_MINUTE
    }

    /// Raw tick count.
    #[inline]
    pub fn ticks(self) -> u64 {
        self.0
    }

    /// This time advanced by a duration.
    #[inline]
    pub fn after(self, duration: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(duration.0))
    }
}

/// An event waiting in the queue.
#[derive(Debug)]
pub struct QueuedEvent<E> {
    /// When the event fires.
    pub at: SimTime,
    /// The task to resume.
    pub task: TaskId,
    /// The payload delivered to the task.
    pub event: E,
    seq: u64,
}

impl<E> PartialEq for QueuedEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for QueuedEvent<E> {}

impl<E> PartialOrd for QueuedEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for QueuedEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // seq breaks time ties: FIFO by scheduling order.
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Time-ordered event queue with FIFO tie-breaking.
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<Reverse<QueuedEvent<E>>>,
    seq: u64,
}

impl<E> EventQueue<E> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Schedules `event` for `task` at absolute time `at`.
    pub fn schedule(&mut self, at: SimTime, task: TaskId, event: E) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(QueuedEvent {
            at,
            task,
            event,
            seq,
        }));
    }

    /// Removes and returns the earliest event, if any.
    pub fn pop(&mut self) -> Option<QueuedEvent<E>> {
        self.heap.pop().map(|Reverse(ev)| ev)
    }

    /// Whether any events remain.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_minutes_roundtrip() {
        let t = SimTime::from_minutes(12.34);
        assert_eq!(t.ticks(), 1234);
        assert!((t.as_minutes() - 12.34).abs() < 1e-12);

        // Negative clamps to zero.
        assert_eq!(SimTime::from_minutes(-3.0), SimTime::ZERO);
    }

    #[test]
    fn test_sim_time_after() {
        let t = SimTime::from_minutes(10.0).after(SimTime::from_minutes(2.5));
        assert!((t.as_minutes() - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_events_pop_in_time_order() {
        let mut q: EventQueue<&str> = EventQueue::new();
        q.schedule(SimTime::from_minutes(30.0), TaskId(0), "late");
        q.schedule(SimTime::from_minutes(5.0), TaskId(1), "early");
        q.schedule(SimTime::from_minutes(20.0), TaskId(2), "middle");

        assert_eq!(q.pop().unwrap().event, "early");
        assert_eq!(q.pop().unwrap().event, "middle");
        assert_eq!(q.pop().unwrap().event, "late");
        assert!(q.pop().is_none());
    }

    #[test]
    fn test_equal_time_events_are_fifo() {
        let mut q: EventQueue<u32> = EventQueue::new();
        let t = SimTime::from_minutes(10.0);
        for i in 0..5 {
            q.schedule(t, TaskId(i as usize), i);
        }
        for i in 0..5 {
            assert_eq!(q.pop().unwrap().event, i);
        }
    }

    #[test]
    fn test_fifo_holds_across_interleaved_times() {
        let mut q: EventQueue<&str> = EventQueue::new();
        let t1 = SimTime::from_minutes(10.0);
        q.schedule(t1, TaskId(0), "first@10");
        q.schedule(SimTime::from_minutes(1.0), TaskId(1), "only@1");
        q.schedule(t1, TaskId(2), "second@10");

        assert_eq!(q.pop().unwrap().event, "only@1");
        assert_eq!(q.pop().unwrap().event, "first@10");
        assert_eq!(q.pop().unwrap().event, "second@10");
    }
}
