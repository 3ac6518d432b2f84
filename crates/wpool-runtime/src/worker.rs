//! Worker thread lifecycle
//!
//! Each worker owns exactly one queue (a `RingQueue` plus optional wake
//! primitive, or a `LockedQueue`) and runs a perpetual consume loop driven
//! by an explicit state machine.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use wpool_core::{plog_error, plog_trace, Task, Variant};

use crate::locked_queue::LockedQueue;
use crate::ring::RingQueue;
use crate::startup::StartupGate;
use crate::wake::{new_wake, WorkerWake};

/// A worker's explicit lifecycle state. `Stopping` is a required addition
/// this design carries that has no counterpart in the reference C sources,
/// which simply exit their consume loop without a named intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Starting = 0,
    Idle = 1,
    Running = 2,
    Stopping = 3,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerState::Starting,
            1 => WorkerState::Idle,
            2 => WorkerState::Running,
            _ => WorkerState::Stopping,
        }
    }
}

/// Atomic cell holding a `WorkerState`, observable from outside the worker
/// thread for diagnostics (not used for synchronization).
#[derive(Debug, Default)]
pub struct WorkerStateCell(AtomicU8);

impl WorkerStateCell {
    fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Relaxed);
    }

    pub fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Relaxed))
    }
}

/// The per-worker queue, variant-specific.
pub enum WorkerQueue {
    Ring {
        ring: RingQueue,
        wake: Option<Box<dyn WorkerWake>>,
    },
    Locked(LockedQueue),
}

impl WorkerQueue {
    pub fn new(variant: Variant, capacity: usize) -> Self {
        match variant {
            Variant::MutexCondvar => WorkerQueue::Locked(LockedQueue::new(capacity)),
            Variant::Polling => WorkerQueue::Ring {
                ring: RingQueue::new(capacity),
                wake: None,
            },
            Variant::SignalWakeup => WorkerQueue::Ring {
                ring: RingQueue::new(capacity),
                wake: Some(new_wake()),
            },
        }
    }

    /// Enqueue a Task. Returns `Ok(true)` if this push transitioned the
    /// queue from empty to non-empty (only meaningful for `SignalWakeup`,
    /// which wakes the worker on that transition), `Ok(false)` otherwise.
    /// Returns the Task back to the caller on `QueueFull`.
    pub fn try_enqueue(&self, task: Task) -> Result<bool, Task> {
        match self {
            WorkerQueue::Ring { ring, .. } => {
                let was_empty = ring.is_empty();
                ring.try_enqueue(task)?;
                Ok(was_empty)
            }
            WorkerQueue::Locked(q) => {
                q.try_enqueue(task)?;
                Ok(false)
            }
        }
    }

    pub fn wake_one(&self) {
        match self {
            WorkerQueue::Ring { wake: Some(w), .. } => w.wake_one(),
            WorkerQueue::Ring { wake: None, .. } => {}
            WorkerQueue::Locked(q) => q.notify_shutdown(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WorkerQueue::Ring { ring, .. } => ring.len(),
            WorkerQueue::Locked(q) => q.len(),
        }
    }
}

/// A spawned worker: its join handle, shared queue, and diagnostic state.
pub struct WorkerHandle {
    pub index: usize,
    pub queue: Arc<WorkerQueue>,
    pub state: Arc<WorkerStateCell>,
    join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn join(&mut self) {
        if let Some(handle) = self.join.take() {
            let _ = handle.join();
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_worker(
    index: usize,
    variant: Variant,
    capacity: usize,
    idle_spins: u32,
    park_timeout: Duration,
    shutdown: Arc<AtomicBool>,
    ready: Arc<StartupGate>,
) -> Result<WorkerHandle, std::io::Error> {
    let queue = Arc::new(WorkerQueue::new(variant, capacity));
    let state = Arc::new(WorkerStateCell::default());

    let thread_queue = Arc::clone(&queue);
    let thread_state = Arc::clone(&state);

    let join = std::thread::Builder::new()
        .name(format!("wpool-worker-{}", index))
        .spawn(move || {
            wpool_core::plog::set_worker_id(index as u32);
            run_worker(
                index,
                thread_queue,
                thread_state,
                idle_spins,
                park_timeout,
                shutdown,
                ready,
            );
        })?;

    Ok(WorkerHandle {
        index,
        queue,
        state,
        join: Some(join),
    })
}

fn run_worker(
    index: usize,
    queue: Arc<WorkerQueue>,
    state: Arc<WorkerStateCell>,
    idle_spins: u32,
    park_timeout: Duration,
    shutdown: Arc<AtomicBool>,
    ready: Arc<StartupGate>,
) {
    state.set(WorkerState::Starting);
    plog_trace!("worker {} starting", index);

    // Registers readiness and moves straight into the idle loop; it does
    // not itself wait on peers, so a spawn failure elsewhere can never
    // strand this worker (only `Pool::create`'s own `wait_ready` blocks
    // on the full count, and `StartupGate::abort` unblocks that promptly).
    ready.mark_ready();
    state.set(WorkerState::Idle);

    loop {
        let task = match &*queue {
            WorkerQueue::Ring { ring, wake } => poll_or_park(ring, wake.as_deref(), idle_spins, park_timeout),
            WorkerQueue::Locked(q) => q.wait_dequeue(park_timeout, &shutdown),
        };

        if let Some(task) = task {
            state.set(WorkerState::Running);
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task.run())) {
                plog_error!("worker {} task panicked: {:?}", index, panic_message(&payload));
            }
            state.set(WorkerState::Idle);
            continue;
        }

        if shutdown.load(Ordering::Acquire) {
            break;
        }
    }

    state.set(WorkerState::Stopping);
    drain_remaining(&queue, index);
    plog_trace!("worker {} stopped", index);
}

fn poll_or_park(
    ring: &RingQueue,
    wake: Option<&dyn WorkerWake>,
    idle_spins: u32,
    park_timeout: Duration,
) -> Option<Task> {
    if let Some(task) = ring.try_dequeue() {
        return Some(task);
    }

    match wake {
        Some(wake) => {
            wake.park(park_timeout);
            ring.try_dequeue()
        }
        None => {
            for _ in 0..idle_spins {
                if let Some(task) = ring.try_dequeue() {
                    return Some(task);
                }
                std::hint::spin_loop();
            }
            std::thread::yield_now();
            ring.try_dequeue()
        }
    }
}

fn drain_remaining(queue: &WorkerQueue, index: usize) {
    loop {
        let task = match queue {
            WorkerQueue::Ring { ring, .. } => ring.try_dequeue(),
            WorkerQueue::Locked(q) => q.try_dequeue(),
        };
        match task {
            Some(task) => {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task.run())) {
                    plog_error!(
                        "worker {} task panicked during drain: {:?}",
                        index,
                        panic_message(&payload)
                    );
                }
            }
            None => break,
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
