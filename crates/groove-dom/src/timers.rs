//! Timer queue
//!
//! setTimeout on a virtual clock. The host advances time explicitly, so
//! firing order is deterministic: earliest deadline first, ties broken by
//! scheduling order.

use std::collections::{BTreeMap, HashMap};

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Pending one-shot timers
#[derive(Debug)]
pub struct TimerQueue<C> {
    next_id: u64,
    by_deadline: BTreeMap<(u64, TimerId), C>,
    deadlines: HashMap<TimerId, u64>,
}

impl<C> Default for TimerQueue<C> {
    fn default() -> Self {
        Self {
            next_id: 1,
            by_deadline: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<C> TimerQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` to run `delay_ms` after `now_ms`
    pub fn set_timeout(&mut self, now_ms: u64, delay_ms: u64, callback: C) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = now_ms.saturating_add(delay_ms);
        self.by_deadline.insert((due, id), callback);
        self.deadlines.insert(id, due);
        id
    }

    /// Cancel a timer. Returns false if it already fired or never existed.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(due) => self.by_deadline.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest timer due at or before `deadline_ms`
    pub fn pop_due(&mut self, deadline_ms: u64) -> Option<(u64, TimerId, C)> {
        let (&(due, id), _) = self.by_deadline.first_key_value()?;
        if due > deadline_ms {
            return None;
        }
        let callback = self.by_deadline.remove(&(due, id))?;
        self.deadlines.remove(&id);
        Some((due, id, callback))
    }

    /// Deadline of the next timer
    pub fn next_deadline(&self) -> Option<u64> {
        self.by_deadline.keys().next().map(|&(due, _)| due)
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.by_deadline.is_empty()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }
}
