//! Error types for the worker-pool subsystem

use core::fmt;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur in pool operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Target worker's queue was at capacity
    QueueFull,

    /// `queue_size < thread_count`, a zero size, or (under `Variant::SignalWakeup`)
    /// a per-worker capacity that isn't a power of two
    InvalidConfig(&'static str),

    /// OS denied thread creation during `Pool::create`
    SpawnFailed,

    /// Pool operation attempted after shutdown was requested
    ShuttingDown,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::QueueFull => write!(f, "worker queue is full"),
            PoolError::InvalidConfig(msg) => write!(f, "invalid pool config: {}", msg),
            PoolError::SpawnFailed => write!(f, "failed to spawn worker thread"),
            PoolError::ShuttingDown => write!(f, "pool is shutting down"),
        }
    }
}

impl std::error::Error for PoolError {}
