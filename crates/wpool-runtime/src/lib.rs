//! Worker-pool runtime: the queue implementations, worker lifecycle, and
//! the pool itself.

pub mod locked_queue;
pub mod pool;
pub mod ring;
pub mod startup;
pub mod wake;
pub mod worker;

pub use locked_queue::LockedQueue;
pub use pool::{pool_create, pool_destroy, pool_enqueue, Pool};
pub use ring::RingQueue;
pub use startup::StartupGate;
pub use wake::WorkerWake;
pub use worker::{WorkerHandle, WorkerQueue, WorkerState};
