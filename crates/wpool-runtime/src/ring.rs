//! Single-producer/single-consumer bounded ring buffer of Tasks
//!
//! `count` is the only variable the producer and consumer ever observe
//! across threads; `in_idx`/`out_idx` are private to their owning side.
//! A slot is always written before `count` is incremented, and always
//! read before `count` is decremented, so the `Release`/`Acquire` pair on
//! `count` is what makes a dequeued Task's contents visible.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use wpool_core::Task;

/// Bounded SPSC ring buffer. Capacity is fixed at construction; capacity
/// 1 (unbuffered hand-off) is legal. Construction panics if capacity is
/// zero — callers validate this via `PoolConfig::validate` first.
pub struct RingQueue {
    buffer: Box<[UnsafeCell<MaybeUninit<Task>>]>,
    capacity: usize,
    mask: Option<usize>,
    in_idx: UnsafeCell<usize>,
    out_idx: UnsafeCell<usize>,
    count: AtomicUsize,
}

// Safety: `in_idx`/`buffer` writes are confined to the single producer,
// `out_idx`/`buffer` reads to the single consumer; `count` mediates
// visibility between them.
unsafe impl Send for RingQueue {}
unsafe impl Sync for RingQueue {}

impl RingQueue {
    /// Create a ring with the given capacity. Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingQueue capacity must be > 0");
        let mut buffer = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            buffer.push(UnsafeCell::new(MaybeUninit::uninit()));
        }
        let mask = capacity.is_power_of_two().then_some(capacity - 1);
        Self {
            buffer: buffer.into_boxed_slice(),
            capacity,
            mask,
            in_idx: UnsafeCell::new(0),
            out_idx: UnsafeCell::new(0),
            count: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn advance(&self, idx: usize) -> usize {
        match self.mask {
            Some(mask) => (idx + 1) & mask,
            None => (idx + 1) % self.capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current occupancy. Racy by construction (the opposite side may be
    /// concurrently mutating it); useful only as a hint.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Producer-only. Returns the Task back to the caller if the ring is
    /// full rather than silently dropping it.
    pub fn try_enqueue(&self, task: Task) -> Result<(), Task> {
        if self.count.load(Ordering::Acquire) == self.capacity {
            return Err(task);
        }

        // Safety: single producer, in_idx is only ever touched here.
        let in_idx = unsafe { *self.in_idx.get() };
        unsafe {
            (*self.buffer[in_idx].get()).write(task);
        }
        unsafe {
            *self.in_idx.get() = self.advance(in_idx);
        }

        self.count.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Consumer-only.
    pub fn try_dequeue(&self) -> Option<Task> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }

        // Safety: single consumer, out_idx is only ever touched here.
        let out_idx = unsafe { *self.out_idx.get() };
        let task = unsafe { (*self.buffer[out_idx].get()).assume_init_read() };
        unsafe {
            *self.out_idx.get() = self.advance(out_idx);
        }

        self.count.fetch_sub(1, Ordering::Release);
        Some(task)
    }
}

impl Drop for RingQueue {
    fn drop(&mut self) {
        // Drain any Tasks still queued so their closures run Drop.
        while self.try_dequeue().is_some() {}
    }
}
