//! A variant-parameterized worker pool.
//!
//! Three interchangeable queue/idle-wait disciplines share one `Pool`
//! surface: a mutex+condvar shared queue ([`Variant::MutexCondvar`]), a
//! lock-free per-worker ring with spin/yield idling
//! ([`Variant::Polling`]), and the same ring with directed futex/condvar
//! parking ([`Variant::SignalWakeup`]).
//!
//! ```no_run
//! use wpool::{Pool, PoolConfig, Task};
//!
//! let pool = Pool::create(PoolConfig::from_env()).expect("pool create");
//! pool.enqueue(Task::new(|| println!("hello from a worker"))).unwrap();
//! pool.destroy();
//! ```

pub use wpool_core::{plog, plog_error, plog_info, PoolConfig, PoolError, PoolResult, Task, Variant};
pub use wpool_runtime::{pool_create, pool_destroy, pool_enqueue, Pool};
