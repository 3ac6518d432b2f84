//! The startup readiness handshake.
//!
//! `Pool::create` must not return until every worker it spawned has reached
//! `Idle` for the first time, but it must also be able to unblock on a
//! mid-loop spawn failure without waiting for workers that were never
//! spawned. A `std::sync::Barrier` can't do this: it trips only when exactly
//! the party count it was built with all call `wait()`, so a short count
//! (fewer workers than planned) leaves it permanently untripped and any
//! caller blocked on it deadlocks. `StartupGate` replaces it with a ready
//! counter the creator waits on against a target, plus an abort flag that
//! unblocks that wait immediately regardless of how many workers reached it.

use std::sync::{Condvar, Mutex};

struct GateState {
    ready: usize,
    aborted: bool,
}

pub struct StartupGate {
    state: Mutex<GateState>,
    condvar: Condvar,
}

impl StartupGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                ready: 0,
                aborted: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Called once by each worker right before it enters its `Idle` loop.
    pub fn mark_ready(&self) {
        let mut state = self.state.lock().unwrap();
        state.ready += 1;
        self.condvar.notify_all();
    }

    /// Called from `Pool::create`'s spawn-failure path so any workers
    /// already spawned (and already past, or still short of, `mark_ready`)
    /// don't leave a waiter parked on a target that can no longer be met.
    pub fn abort(&self) {
        let mut state = self.state.lock().unwrap();
        state.aborted = true;
        self.condvar.notify_all();
    }

    /// Block until `target` workers have called `mark_ready`, or until
    /// `abort` is called. Returns `true` if `target` was reached.
    pub fn wait_ready(&self, target: usize) -> bool {
        let guard = self.state.lock().unwrap();
        let guard = self
            .condvar
            .wait_while(guard, |s| s.ready < target && !s.aborted)
            .unwrap();
        guard.ready >= target
    }
}

impl Default for StartupGate {
    fn default() -> Self {
        Self::new()
    }
}
