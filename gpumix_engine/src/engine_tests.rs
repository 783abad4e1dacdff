//! Unit tests for the Engine logging entry point
//!
//! IMPORTANT: LOGGER is a global OnceLock shared across all tests.
//! All tests are marked with #[serial] to run sequentially.

use crate::gpumix::{Engine, Error, Result};
use crate::gpumix::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
#[derive(Clone)]
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install() -> TestLogger {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());
    logger
}

// ============================================================================
// LOGGER MANAGEMENT TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_logs_without_panic() {
    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "gpumix::test", "hello".to_string());
}

#[test]
#[serial]
fn test_custom_logger_receives_logs() {
    let logger = install();
    Engine::log(LogSeverity::Debug, "gpumix::test", "captured".to_string());

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Debug);
    assert_eq!(entries[0].source, "gpumix::test");
    assert_eq!(entries[0].message, "captured");
    assert!(entries[0].file.is_none());
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let logger = install();
    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "gpumix::test", "not captured".to_string());
    assert!(logger.entries().is_empty());
}

#[test]
#[serial]
fn test_log_detailed_with_file_line() {
    let logger = install();
    Engine::log_detailed(LogSeverity::Error, "gpumix::test", "bad".to_string(), "x.rs", 7);

    let entries = logger.entries();
    assert_eq!(entries[0].file, Some("x.rs"));
    assert_eq!(entries[0].line, Some(7));
    Engine::reset_logger();
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
#[serial]
fn test_severity_macros() {
    let logger = install();
    crate::engine_trace!("gpumix::test", "t {}", 1);
    crate::engine_debug!("gpumix::test", "d {}", 2);
    crate::engine_info!("gpumix::test", "i {}", 3);
    crate::engine_warn!("gpumix::test", "w {}", 4);
    crate::engine_error!("gpumix::test", "e {}", 5);

    let entries = logger.entries();
    let severities: Vec<LogSeverity> = entries.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]
    );
    assert_eq!(entries[4].message, "e 5");
    assert!(entries[4].line.is_some());
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_backend_error() {
    let logger = install();
    let err = crate::engine_err!("gpumix::test", "Failed to map: {:?}", "ERROR_MEMORY_MAP_FAILED");

    match err {
        Error::BackendError(msg) => assert_eq!(msg, "Failed to map: \"ERROR_MEMORY_MAP_FAILED\""),
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(logger.entries()[0].severity, LogSeverity::Error);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    fn fails() -> Result<u32> {
        crate::engine_bail!("gpumix::test", "stop at {}", 3);
    }
    let logger = install();
    assert!(matches!(fails(), Err(Error::BackendError(_))));
    assert_eq!(logger.entries().len(), 1);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_warn_is_invalid_resource() {
    fn rejects(len: usize) -> Result<()> {
        if len > 4 {
            crate::engine_bail_warn!("gpumix::test", "payload of {} bytes too large", len);
        }
        Ok(())
    }
    let logger = install();
    assert!(rejects(2).is_ok());
    assert!(matches!(rejects(9), Err(Error::InvalidResource(_))));
    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Warn);
    Engine::reset_logger();
}
