//! Delayed-task host contracts and a deterministic in-memory adapter.
//!
//! The desktop runtime never sleeps. It asks a [`TimerHost`] to deliver a payload back after a
//! delay and treats the delivery as a new external event. Browser hosts back this with
//! `setTimeout`; tests and headless hosts use [`VirtualTimerQueue`] and advance time by hand.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};

/// Opaque handle returned by [`TimerHost::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Host service that delivers a payload once after `delay_ms`.
pub trait TimerHost<T> {
    /// Schedules `payload` for delivery after `delay_ms`.
    fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId;

    /// Cancels a pending delivery.
    ///
    /// Returns `true` when the timer was still pending.
    fn cancel(&mut self, timer: TimerId) -> bool;
}

impl<T, H: TimerHost<T> + ?Sized> TimerHost<T> for Box<H> {
    fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        (**self).schedule(delay_ms, payload)
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        (**self).cancel(timer)
    }
}

#[derive(Debug)]
struct QueueInner<T> {
    now_ms: u64,
    next_id: u64,
    // Keyed by (deadline, id) so equal deadlines fire in scheduling order.
    pending: BTreeMap<(u64, TimerId), T>,
}

/// Manually advanced timer queue with a virtual millisecond clock.
///
/// Clones share the same queue, so a test can hold one handle while the runtime holds another.
#[derive(Debug)]
pub struct VirtualTimerQueue<T> {
    inner: Rc<RefCell<QueueInner<T>>>,
}

impl<T> Clone for VirtualTimerQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for VirtualTimerQueue<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueInner {
                now_ms: 0,
                next_id: 1,
                pending: BTreeMap::new(),
            })),
        }
    }
}

impl<T> VirtualTimerQueue<T> {
    /// Creates an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of deliveries still pending.
    pub fn pending_len(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Pops the earliest delivery due at or before `until_ms`, moving the clock to its deadline.
    ///
    /// The internal borrow is released before returning, so callers may schedule new timers
    /// while handling the payload.
    pub fn pop_due(&self, until_ms: u64) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        let key = *inner.pending.keys().next()?;
        if key.0 > until_ms {
            return None;
        }
        let payload = inner.pending.remove(&key)?;
        inner.now_ms = inner.now_ms.max(key.0);
        Some(payload)
    }

    /// Moves the clock forward without delivering anything.
    pub fn set_now(&self, now_ms: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.max(now_ms);
    }

    /// Advances the clock by `delta_ms` and returns every payload that became due, in order.
    pub fn advance_by(&self, delta_ms: u64) -> Vec<T> {
        let until = self.now_ms().saturating_add(delta_ms);
        let mut fired = Vec::new();
        while let Some(payload) = self.pop_due(until) {
            fired.push(payload);
        }
        self.set_now(until);
        fired
    }
}

impl<T> TimerHost<T> for VirtualTimerQueue<T> {
    fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id = inner.next_id.saturating_add(1);
        let deadline = inner.now_ms.saturating_add(delay_ms);
        inner.pending.insert((deadline, id), payload);
        id
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let key = inner.pending.keys().find(|(_, id)| *id == timer).copied();
        match key {
            Some(key) => inner.pending.remove(&key).is_some(),
            None => false,
        }
    }
}
