//! Linux futex-based wake primitive
//!
//! The futex word counts pending wakes: `wake_one` increments it and
//! wakes a waiter if one is parked; `park` consumes a pending wake if
//! present, otherwise sleeps until woken or `timeout` elapses.

use super::WorkerWake;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

pub struct FutexWake {
    futex: AtomicU32,
    parked: AtomicUsize,
}

impl Default for FutexWake {
    fn default() -> Self {
        Self {
            futex: AtomicU32::new(0),
            parked: AtomicUsize::new(0),
        }
    }
}

impl FutexWake {
    fn try_consume(&self) -> bool {
        loop {
            let current = self.futex.load(Ordering::Acquire);
            if current == 0 {
                return false;
            }
            if self
                .futex
                .compare_exchange_weak(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }
}

impl WorkerWake for FutexWake {
    fn park(&self, timeout: Duration) {
        if self.try_consume() {
            return;
        }

        self.parked.fetch_add(1, Ordering::SeqCst);

        let ts = libc::timespec {
            tv_sec: timeout.as_secs() as i64,
            tv_nsec: timeout.subsec_nanos() as i64,
        };

        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.futex.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                0u32,
                &ts as *const libc::timespec,
                std::ptr::null::<u32>(),
                0u32,
            );
        }

        self.parked.fetch_sub(1, Ordering::SeqCst);
        self.try_consume();
    }

    fn wake_one(&self) {
        self.futex.fetch_add(1, Ordering::Release);
        if self.parked.load(Ordering::Acquire) > 0 {
            unsafe {
                libc::syscall(
                    libc::SYS_futex,
                    self.futex.as_ptr(),
                    libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                    1i32,
                    std::ptr::null::<libc::timespec>(),
                    std::ptr::null::<u32>(),
                    0u32,
                );
            }
        }
    }
}

// Safety: FutexWake contains only atomics.
unsafe impl Send for FutexWake {}
unsafe impl Sync for FutexWake {}
