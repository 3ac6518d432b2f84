//! Worker-context-aware print macros
//!
//! Thread-safe debug output in the spirit of `eprintln!`, but tagged with
//! the current worker id (when running inside a pool worker) and gated by
//! an environment-controlled level.
//!
//! # Environment Variables
//!
//! - `WPOOL_LOG_LEVEL` - off|error|warn|info|debug|trace (also accepts 0-5)
//! - `WPOOL_LOG_TIME=1` - prefix each line with a nanosecond timestamp
//! - `WPOOL_LOG_FLUSH=1` - flush stderr after every line
//!
//! # Output Format
//!
//! `[LEVEL] [w<id>] message`, e.g. `[INFO]  [w2] worker idle`.

use crate::env::env_get_bool;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Instant;

/// Log levels, ascending severity-to-verbosity
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static TIME_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize logging from environment variables. Called automatically on
/// first use, but can be called explicitly for deterministic setup.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    START_TIME.get_or_init(Instant::now);
    FLUSH_ENABLED.store(env_get_bool("WPOOL_LOG_FLUSH", false), Ordering::Relaxed);
    TIME_ENABLED.store(env_get_bool("WPOOL_LOG_TIME", false), Ordering::Relaxed);

    if let Ok(val) = std::env::var("WPOOL_LOG_LEVEL") {
        let level = match val.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => LogLevel::Info,
        };
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
fn time_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    TIME_ENABLED.load(Ordering::Relaxed)
}

/// Get current log level
#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level programmatically
pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= log_level() as u8
}

#[inline]
fn elapsed_ns() -> u64 {
    let start = START_TIME.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

thread_local! {
    static WORKER_ID: std::cell::Cell<Option<u32>> = const { std::cell::Cell::new(None) };
}

/// Set the current worker id for this thread (called by the worker loop)
pub fn set_worker_id(id: u32) {
    WORKER_ID.with(|w| w.set(Some(id)));
}

/// Get the current worker id, if this thread is a pool worker
#[inline]
pub fn get_worker_id() -> Option<u32> {
    WORKER_ID.with(|w| w.get())
}

fn format_context() -> String {
    match get_worker_id() {
        Some(id) => format!("[w{}]", id),
        None => "[w-]".to_string(),
    }
}

#[doc(hidden)]
pub fn _plog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    let _ = write!(handle, "{} ", level.prefix());
    if time_enabled() {
        let _ = write!(handle, "[{}] ", elapsed_ns());
    }
    let _ = write!(handle, "{} ", format_context());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");

    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Error-level log with worker context
#[macro_export]
macro_rules! plog_error {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl($crate::plog::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning-level log with worker context
#[macro_export]
macro_rules! plog_warn {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl($crate::plog::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info-level log with worker context
#[macro_export]
macro_rules! plog_info {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl($crate::plog::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug-level log with worker context
#[macro_export]
macro_rules! plog_debug {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl($crate::plog::LogLevel::Debug, format_args!($($arg)*));
    }};
}

/// Trace-level log with worker context
#[macro_export]
macro_rules! plog_trace {
    ($($arg:tt)*) => {{
        $crate::plog::_plog_impl($crate::plog::LogLevel::Trace, format_args!($($arg)*));
    }};
}
