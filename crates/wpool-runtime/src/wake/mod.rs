//! Directed wake primitive for `Variant::SignalWakeup`
//!
//! The producer calls `wake_one()` only on the queue's `0 -> 1`
//! transition; the worker calls `park(timeout)` when its ring is empty.
//! `park` always returns regardless of whether it was woken or timed
//! out — the worker re-checks the ring either way.

use std::time::Duration;

pub trait WorkerWake: Send + Sync {
    /// Park until woken or `timeout` elapses. Return value is informational
    /// only; callers must re-check their queue regardless.
    fn park(&self, timeout: Duration);

    /// Wake the parked worker, if any. Safe to call when nobody is parked.
    fn wake_one(&self);
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexWake as PlatformWake;
    } else {
        mod fallback;
        pub use fallback::CondvarWake as PlatformWake;
    }
}

pub fn new_wake() -> Box<dyn WorkerWake> {
    Box::new(PlatformWake::default())
}
