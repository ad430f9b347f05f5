//! Timer Queue - Virtual clock for deferred work
//!
//! The carousel never blocks and never spawns threads. Every deferral
//! (autoplay interval, the two steps of a loop jump) is an entry in this
//! queue, and the owner drives the clock forward from its event loop.
//!
//! # Pattern
//!
//! - `set_interval` re-arms itself each time it fires
//! - `set_timeout` fires once and is gone
//! - `clear` is idempotent
//! - Entries due at the same instant fire in the order they were scheduled
//!
//! # Example
//!
//! ```ignore
//! let mut timers = TimerQueue::new();
//! let id = timers.set_interval(1000, Task::Tick);
//!
//! while let Some(task) = timers.pop_due(2500) {
//!     run(task); // fires at 1000 and 2000
//! }
//! timers.advance_to(2500);
//! timers.clear(id);
//! ```

use log::trace;

// =============================================================================
// TYPES
// =============================================================================

/// Handle to a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: u64,
    interval: Option<u64>,
    /// Tie-breaker for entries due at the same instant.
    seq: u64,
    task: T,
}

/// Single-threaded queue of timed tasks on a millisecond clock.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// QUEUE
// =============================================================================

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    /// Current clock value in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Schedule `task` once, `delay` ms from now.
    pub fn set_timeout(&mut self, delay: u64, task: T) -> TimerId {
        self.schedule(delay, None, task)
    }

    /// Schedule `task` every `period` ms, first firing one period from now.
    ///
    /// A zero period is treated as 1 ms so the clock always makes progress.
    pub fn set_interval(&mut self, period: u64, task: T) -> TimerId {
        let period = period.max(1);
        self.schedule(period, Some(period), task)
    }

    /// Cancel an entry. Returns false if it had already fired or been cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Drop every entry.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Move the clock forward without firing anything.
    ///
    /// Never moves backwards.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    fn schedule(&mut self, delay: u64, interval: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            interval,
            seq,
            task,
        });
        id
    }

    fn earliest(&self, until: u64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(pos, _)| pos)
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Pop the earliest entry due at or before `until`.
    ///
    /// The clock moves to the entry's due time. Intervals are re-armed one
    /// period later and keep their id.
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let pos = self.earliest(until)?;
        let due = self.entries[pos].due;
        self.now = self.now.max(due);

        let task = match self.entries[pos].interval {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = &mut self.entries[pos];
                entry.due = due + period;
                entry.seq = seq;
                entry.task.clone()
            }
            None => self.entries.remove(pos).task,
        };

        trace!("timer fired at {}ms", self.now);
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Task {
        A,
        B,
    }

    fn drain(queue: &mut TimerQueue<Task>, until: u64) -> Vec<(u64, Task)> {
        let mut fired = Vec::new();
        while let Some(task) = queue.pop_due(until) {
            fired.push((queue.now(), task));
        }
        queue.advance_to(until);
        fired
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(200, Task::A);

        assert!(drain(&mut queue, 199).is_empty());
        assert_eq!(drain(&mut queue, 200), vec![(200, Task::A)]);
        assert!(drain(&mut queue, 1000).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_interval_rearms() {
        let mut queue = TimerQueue::new();
        queue.set_interval(100, Task::A);

        let fired = drain(&mut queue, 350);
        assert_eq!(fired, vec![(100, Task::A), (200, Task::A), (300, Task::A)]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.now(), 350);
    }

    #[test]
    fn test_same_instant_fires_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(50, Task::B);
        queue.set_timeout(50, Task::A);

        assert_eq!(drain(&mut queue, 50), vec![(50, Task::B), (50, Task::A)]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(100, Task::A);

        assert!(queue.is_pending(id));
        assert!(queue.clear(id));
        assert!(!queue.clear(id));
        assert!(!queue.is_pending(id));
        assert!(drain(&mut queue, 1000).is_empty());
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(1000);
        queue.set_timeout(200, Task::A);

        assert_eq!(drain(&mut queue, 1200), vec![(1200, Task::A)]);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut queue: TimerQueue<Task> = TimerQueue::new();
        queue.advance_to(500);
        queue.advance_to(100);
        assert_eq!(queue.now(), 500);
    }
}
