//! The three worker-pool implementation strategies

/// Which task-queue and idle-wait discipline a `Pool` uses.
///
/// All three variants share the same `Task`/`Pool` surface and the same
/// round-robin dispatch and startup-barrier semantics; they differ only in
/// how a worker's queue is synchronized and how an idle worker waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// One shared-per-worker queue guarded by a mutex; a condvar both
    /// blocks the idle worker and wakes it on push.
    MutexCondvar,

    /// Lock-free SPSC ring buffer per worker; the idle worker spins and
    /// yields rather than blocking. Default: lowest wakeup latency at the
    /// cost of burning CPU while idle.
    #[default]
    Polling,

    /// Lock-free SPSC ring buffer per worker; the idle worker parks on a
    /// directed wake primitive (futex on Linux), woken by the producer
    /// only on the queue's `0 -> 1` transition.
    SignalWakeup,
}

impl Variant {
    /// Whether this variant requires a power-of-two per-worker queue capacity
    pub fn requires_power_of_two_capacity(&self) -> bool {
        matches!(self, Variant::SignalWakeup)
    }

    /// Whether this variant uses the lock-free ring queue (as opposed to
    /// the mutex-guarded queue)
    pub fn uses_ring_queue(&self) -> bool {
        matches!(self, Variant::Polling | Variant::SignalWakeup)
    }
}
