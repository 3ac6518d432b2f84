//! Platform-agnostic types shared by the worker-pool runtime: the task
//! envelope, the variant selector, configuration, error taxonomy, and the
//! ambient env/log helpers the runtime crate builds on.

pub mod config;
pub mod env;
pub mod error;
pub mod plog;
pub mod task;
pub mod variant;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use task::Task;
pub use variant::Variant;
