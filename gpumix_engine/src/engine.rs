/// GpuMix Engine - Global logging entry point
///
/// The renderers and the demo report through a single process-wide logger.
/// It starts as `DefaultLogger` and can be swapped at any time, from any thread.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Process-wide logger, `DefaultLogger` until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn install(logger: Box<dyn Logger>) {
    if let Ok(mut current) = logger_lock().write() {
        *current = logger;
    }
}

/// Stamp the entry and hand it to the current logger
///
/// A poisoned lock drops the entry.
fn dispatch(severity: LogSeverity, source: &str, message: String, location: Option<(&'static str, u32)>) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: location.map(|(file, _)| file),
        line: location.map(|(_, line)| line),
    };
    if let Ok(logger) = logger_lock().read() {
        logger.log(&entry);
    }
}

/// Engine-wide services
///
/// # Example
///
/// ```no_run
/// use gpumix_engine::gpumix::{Engine, log::{FileLogger, LogSeverity}};
///
/// Engine::set_logger(FileLogger::new("gpumix.log", LogSeverity::Debug)?);
/// # Ok::<(), gpumix_engine::gpumix::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Replace the global logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        install(Box::new(logger));
    }

    /// Go back to `DefaultLogger`
    pub fn reset_logger() {
        install(Box::new(DefaultLogger));
    }

    /// Log without a source location
    ///
    /// Target of `engine_trace!` through `engine_warn!`. `source` is a module tag
    /// such as `"gpumix::vulkan"`.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        dispatch(severity, source, message, None);
    }

    /// Log with the `file:line` of the call site (`engine_error!`, `engine_err!`)
    pub fn log_detailed(severity: LogSeverity, source: &str, message: String, file: &'static str, line: u32) {
        dispatch(severity, source, message, Some((file, line)));
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
