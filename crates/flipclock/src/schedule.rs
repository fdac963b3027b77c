//! Cancellable delayed actions
//!
//! A `Schedule` is owned by the component whose state its actions mutate.
//! Nothing fires on its own: the owner asks for due actions with
//! `take_due(now)`. Dropping the owner drops every pending action with it.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<A> {
    /// Scheduling order, breaks ties between equal due times
    seq: u64,
    due: Instant,
    action: A,
}

/// Pending actions keyed by due time
#[derive(Debug)]
pub struct Schedule<A> {
    pending: Vec<Pending<A>>,
    next_seq: u64,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Schedule<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `action` to become due `delay` after `now`
    pub fn after(&mut self, now: Instant, delay: Duration, action: A) {
        self.pending.push(Pending {
            seq: self.next_seq,
            due: now + delay,
            action,
        });
        self.next_seq += 1;
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time, if anything is pending
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return every action due at `now`, earliest first.
    /// Actions due at the same instant come out in the order they were scheduled.
    pub fn take_due(&mut self, now: Instant) -> Vec<A> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.action).collect()
    }
}
