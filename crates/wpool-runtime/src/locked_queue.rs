//! Mutex + condvar task queue, used by `Variant::MutexCondvar`
//!
//! Capacity is enforced by comparing `VecDeque::len()` against the
//! configured per-worker capacity inside the locked section. The condvar
//! is notified unconditionally on every successful push; this variant
//! accepts that extra wakeup cost for a simpler implementation, matching
//! the original `thpool.c` reference.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use wpool_core::Task;

pub struct LockedQueue {
    capacity: usize,
    inner: Mutex<VecDeque<Task>>,
    condvar: Condvar,
}

impl LockedQueue {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LockedQueue capacity must be > 0");
        Self {
            capacity,
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            condvar: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the Task back to the caller if the queue is at capacity.
    pub fn try_enqueue(&self, task: Task) -> Result<(), Task> {
        let mut guard = self.inner.lock().unwrap();
        if guard.len() == self.capacity {
            return Err(task);
        }
        guard.push_back(task);
        drop(guard);
        self.condvar.notify_one();
        Ok(())
    }

    pub fn try_dequeue(&self) -> Option<Task> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Block until a Task is available, `shutdown` is set, or `timeout`
    /// elapses, then attempt a dequeue. Used by the worker's idle wait.
    /// `shutdown` is checked as part of the wait predicate so a
    /// `notify_shutdown` call wakes this up promptly instead of only on
    /// the next `push_back`.
    pub fn wait_dequeue(&self, timeout: Duration, shutdown: &AtomicBool) -> Option<Task> {
        let guard = self.inner.lock().unwrap();
        let (mut guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |q| {
                q.is_empty() && !shutdown.load(Ordering::Acquire)
            })
            .unwrap();
        guard.pop_front()
    }

    /// Wake a thread parked in `wait_dequeue` without enqueuing a Task.
    /// Used to make shutdown prompt instead of waiting out `park_timeout`.
    pub fn notify_shutdown(&self) {
        let _guard = self.inner.lock().unwrap();
        self.condvar.notify_all();
    }
}
