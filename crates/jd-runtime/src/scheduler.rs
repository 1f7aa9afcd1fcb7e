use std::collections::BTreeMap;
use std::time::Duration;

/// Handle for a scheduled timer. Ordered by due time, then by the order the
/// timers were scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    due: Duration,
    seq: u64,
}

impl TimerId {
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// Single-threaded timer queue over a virtual clock.
///
/// Nothing here sleeps: callers move time forward with [`Scheduler::pop_due`]
/// and [`Scheduler::advance_to`], which keeps every delay deterministic under
/// test.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<TimerId, E>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            timers: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId {
            due: self.now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(id, event);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        self.timers.remove(&id)
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.keys().next().map(TimerId::due)
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let id = *self.timers.keys().next()?;
        if id.due > until {
            return None;
        }
        self.now = self.now.max(id.due);
        self.timers.remove(&id)
    }

    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
