//! Condvar-backed wake primitive for platforms without futex support

use super::WorkerWake;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

pub struct CondvarWake {
    mutex: Mutex<bool>,
    condvar: Condvar,
}

impl Default for CondvarWake {
    fn default() -> Self {
        Self {
            mutex: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }
}

impl WorkerWake for CondvarWake {
    fn park(&self, timeout: Duration) {
        let mut pending = self.mutex.lock().unwrap();
        if *pending {
            *pending = false;
            return;
        }
        let (mut pending, _) = self
            .condvar
            .wait_timeout_while(pending, timeout, |p| !*p)
            .unwrap();
        *pending = false;
    }

    fn wake_one(&self) {
        *self.mutex.lock().unwrap() = true;
        self.condvar.notify_one();
    }
}
