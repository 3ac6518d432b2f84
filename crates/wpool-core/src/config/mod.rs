//! Pool configuration
//!
//! Provides compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Environment variables (runtime)
//! 2. Library defaults
//!
//! # Example
//!
//! ```
//! use wpool_core::config::PoolConfig;
//! use wpool_core::variant::Variant;
//!
//! let config = PoolConfig::from_env()
//!     .thread_count(8)
//!     .variant(Variant::SignalWakeup);
//! ```

pub mod defaults;

use crate::env::env_get;
use crate::error::PoolError;
use crate::variant::Variant;
use std::time::Duration;

/// Pool configuration with builder pattern.
///
/// Use `from_env()` to start with compile-time defaults and apply any
/// environment variable overrides.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads
    pub thread_count: usize,
    /// Aggregate queue capacity, divided equally across workers
    pub queue_size: usize,
    /// Which queue/idle-wait discipline to use
    pub variant: Variant,
    /// Relaxed spins before yielding, `Variant::Polling` only
    pub idle_spins: u32,
    /// Park timeout, `Variant::SignalWakeup` only (bounds the wait so a
    /// worker re-checks the shutdown flag even without a wakeup)
    pub park_timeout: Duration,
    /// Enable debug-level logging at startup
    pub debug_logging: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PoolConfig {
    /// Build a config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `WPOOL_THREAD_COUNT` - number of worker threads
    /// - `WPOOL_QUEUE_SIZE` - aggregate queue capacity
    /// - `WPOOL_IDLE_SPINS` - relaxed spins before yielding (`Polling`)
    /// - `WPOOL_PARK_TIMEOUT_MS` - park timeout in milliseconds (`SignalWakeup`)
    /// - `WPOOL_DEBUG` - enable debug logging (0/1)
    pub fn from_env() -> Self {
        Self {
            thread_count: env_get("WPOOL_THREAD_COUNT", defaults::THREAD_COUNT),
            queue_size: env_get("WPOOL_QUEUE_SIZE", defaults::QUEUE_SIZE),
            variant: Variant::default(),
            idle_spins: env_get("WPOOL_IDLE_SPINS", defaults::IDLE_SPINS),
            park_timeout: Duration::from_millis(env_get(
                "WPOOL_PARK_TIMEOUT_MS",
                defaults::PARK_TIMEOUT_MS,
            )),
            debug_logging: env_get(
                "WPOOL_DEBUG",
                if defaults::DEBUG_LOGGING { 1usize } else { 0 },
            ) != 0,
        }
    }

    /// Build a config with explicit defaults, ignoring the environment.
    /// Useful for tests or callers that want full control.
    pub fn new() -> Self {
        Self {
            thread_count: defaults::THREAD_COUNT,
            queue_size: defaults::QUEUE_SIZE,
            variant: Variant::default(),
            idle_spins: defaults::IDLE_SPINS,
            park_timeout: Duration::from_millis(defaults::PARK_TIMEOUT_MS),
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    // Builder methods

    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = n;
        self
    }

    pub fn queue_size(mut self, n: usize) -> Self {
        self.queue_size = n;
        self
    }

    pub fn variant(mut self, v: Variant) -> Self {
        self.variant = v;
        self
    }

    pub fn idle_spins(mut self, spins: u32) -> Self {
        self.idle_spins = spins;
        self
    }

    pub fn park_timeout(mut self, d: Duration) -> Self {
        self.park_timeout = d;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Per-worker queue capacity (`queue_size` divided equally, per the
    /// `lf_thpool.c` convention this project follows).
    pub fn per_worker_capacity(&self) -> usize {
        self.queue_size / self.thread_count.max(1)
    }

    /// Validate configuration, returning the first violation found.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.thread_count == 0 {
            return Err(PoolError::InvalidConfig("thread_count must be > 0"));
        }
        if self.queue_size == 0 {
            return Err(PoolError::InvalidConfig("queue_size must be > 0"));
        }
        if self.queue_size < self.thread_count {
            return Err(PoolError::InvalidConfig(
                "queue_size must be >= thread_count",
            ));
        }
        let per_worker = self.per_worker_capacity();
        if per_worker == 0 {
            return Err(PoolError::InvalidConfig(
                "queue_size / thread_count must be > 0",
            ));
        }
        if self.variant.requires_power_of_two_capacity() && !per_worker.is_power_of_two() {
            return Err(PoolError::InvalidConfig(
                "queue_size / thread_count must be a power of two for Variant::SignalWakeup",
            ));
        }
        Ok(())
    }

    /// Print configuration to stderr (debugging aid)
    pub fn print(&self) {
        eprintln!("Pool Configuration:");
        eprintln!("  thread_count:    {}", self.thread_count);
        eprintln!("  queue_size:      {}", self.queue_size);
        eprintln!("  per_worker_cap:  {}", self.per_worker_capacity());
        eprintln!("  variant:         {:?}", self.variant);
        eprintln!("  idle_spins:      {}", self.idle_spins);
        eprintln!("  park_timeout:    {:?}", self.park_timeout);
        eprintln!("  debug_logging:   {}", self.debug_logging);
    }
}
