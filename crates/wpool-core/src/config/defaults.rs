//! Compile-time default values for `PoolConfig`
//!
//! Mirrors the original C sources' `THREAD_COUNT 4` default and the
//! `queue_size / thread_count` per-worker capacity convention.

pub const THREAD_COUNT: usize = 4;
pub const QUEUE_SIZE: usize = 256;
pub const IDLE_SPINS: u32 = 1_000;
pub const PARK_TIMEOUT_MS: u64 = 1_000;
pub const DEBUG_LOGGING: bool = false;
