/// Validation layer messenger
///
/// Messages that pass the configured severity and category filters are counted,
/// grouped by message ID and written to stderr (colored), to a file (plain) or to
/// both. An error can abort the process so a debugger stops at the faulty call.

use ash::vk;
use colored::*;
use gpumix_engine::gpumix::render::{DebugSeverity, DebugOutput, DebugMessageFilter, ValidationStats};
use gpumix_engine::engine_error;
use std::collections::HashMap;
use std::ffi::CStr;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Messenger settings, copied out of the renderer `Config` at instance creation
#[derive(Debug, Clone)]
pub struct Config {
    pub severity: DebugSeverity,
    pub output: DebugOutput,
    pub message_filter: DebugMessageFilter,
    pub break_on_error: bool,
    pub enable_stats: bool,
}

/// State read by the callback, which has no user data pointer to carry it
struct MessengerState {
    config: Config,
    /// Occurrences per message ID
    repeats: HashMap<String, u32>,
}

static STATE: Mutex<Option<MessengerState>> = Mutex::new(None);

/// Counters indexed by `MessageLevel as usize`
static COUNTS: [AtomicU32; 4] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];

/// Severity bucket of a single validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Verbose = 3,
}

impl MessageLevel {
    pub(crate) fn from_vk(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Self {
        if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            MessageLevel::Error
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            MessageLevel::Warning
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
            MessageLevel::Info
        } else {
            MessageLevel::Verbose
        }
    }

    fn label(self) -> &'static str {
        match self {
            MessageLevel::Error => "ERROR",
            MessageLevel::Warning => "WARNING",
            MessageLevel::Info => "INFO",
            MessageLevel::Verbose => "VERBOSE",
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            MessageLevel::Error => text.red().bold(),
            MessageLevel::Warning => text.yellow().bold(),
            MessageLevel::Info => text.cyan(),
            MessageLevel::Verbose => text.bright_black(),
        }
    }
}

/// Severity flags handed to the messenger for a configured minimum severity
pub(crate) fn severity_flags(severity: DebugSeverity) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    let errors = vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
    let warnings = errors | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING;
    match severity {
        DebugSeverity::ErrorsOnly => errors,
        DebugSeverity::ErrorsAndWarnings => warnings,
        DebugSeverity::All => {
            warnings | vk::DebugUtilsMessageSeverityFlagsEXT::INFO | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
        }
    }
}

/// Category label, in the order validation > performance > general
pub(crate) fn message_type_label(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        "Validation"
    } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        "Performance"
    } else {
        "General"
    }
}

/// Whether a message passes the configured severity and category filters
pub(crate) fn should_display(
    config: &Config,
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
) -> bool {
    if !severity_flags(config.severity).intersects(message_severity) {
        return false;
    }
    match message_type_label(message_type) {
        "Validation" => config.message_filter.show_validation,
        "Performance" => config.message_filter.show_performance,
        _ => config.message_filter.show_general,
    }
}

/// One message in the plain file format
///
/// `repeats` above 1 appends a `[xN]` marker to the header line.
pub(crate) fn format_plain_message(
    level: MessageLevel,
    category: &str,
    message_id: &str,
    message: &str,
    repeats: u32,
) -> String {
    let marker = if repeats > 1 { format!(" [x{}]", repeats) } else { String::new() };
    format!("[VULKAN {}] [{}]{}\n  id: {}\n  {}\n", level.label(), category, marker, message_id, message)
}

fn format_console_message(level: MessageLevel, category: &str, message_id: &str, message: &str, repeats: u32) -> String {
    let marker = if repeats > 1 { format!(" [x{}]", repeats) } else { String::new() };
    format!(
        "{} {} {}{}\n  {} {}\n  {}\n",
        "[VULKAN".bright_blue().bold(),
        level.paint(&format!("{}]", level.label())),
        format!("[{}]", category).bright_black(),
        marker.yellow(),
        "id:".bright_black(),
        message_id,
        message
    )
}

/// Install the messenger settings and clear counters from a previous instance
pub fn init_debug_config(config: Config) {
    for counter in &COUNTS {
        counter.store(0, Ordering::Relaxed);
    }
    if let Ok(mut state) = STATE.lock() {
        *state = Some(MessengerState { config, repeats: HashMap::new() });
    }
}

/// Messages counted since the messenger was configured
pub fn get_validation_stats() -> ValidationStats {
    let count = |level: MessageLevel| COUNTS[level as usize].load(Ordering::Relaxed);
    ValidationStats {
        errors: count(MessageLevel::Error),
        warnings: count(MessageLevel::Warning),
        info: count(MessageLevel::Info),
        verbose: count(MessageLevel::Verbose),
    }
}

/// Print the counters, and how many message IDs were reported more than once
pub fn print_validation_stats_report() {
    let stats = get_validation_stats();
    if stats.total() == 0 {
        println!("\n{}", "No validation messages".green().bold());
        return;
    }

    println!("\n{}", "--- validation messages ---".bright_blue().bold());
    for (level, count) in [
        (MessageLevel::Error, stats.errors),
        (MessageLevel::Warning, stats.warnings),
        (MessageLevel::Info, stats.info),
        (MessageLevel::Verbose, stats.verbose),
    ] {
        if count > 0 {
            println!("  {:<8} {}", level.paint(level.label()), count);
        }
    }
    println!("  {:<8} {}", "TOTAL".white().bold(), stats.total());

    let repeated = STATE.lock().ok().and_then(|state| {
        state.as_ref().map(|state| state.repeats.values().filter(|&&n| n > 1).count())
    });
    if let Some(repeated) = repeated.filter(|&n| n > 0) {
        println!("  {} message id(s) repeated", repeated);
    }
}

unsafe fn c_str_or<'a>(ptr: *const std::os::raw::c_char, fallback: &'a str) -> &'a str {
    if ptr.is_null() {
        fallback
    } else {
        CStr::from_ptr(ptr).to_str().unwrap_or("<invalid utf-8>")
    }
}

fn append_to_file(path: &str, text: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", text);
    }
}

/// Debug-utils messenger callback, installed by `VulkanInstance`
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }
    let data = *p_callback_data;
    let message_id = c_str_or(data.p_message_id_name, "unknown");
    let message = c_str_or(data.p_message, "");

    // Decide and count under the lock, print outside it
    let (config, repeats) = {
        let Ok(mut guard) = STATE.lock() else { return vk::FALSE };
        let Some(state) = guard.as_mut() else { return vk::FALSE };
        if !should_display(&state.config, message_severity, message_type) {
            return vk::FALSE;
        }
        let repeats = if state.config.enable_stats {
            let n = state.repeats.entry(message_id.to_string()).or_insert(0);
            *n += 1;
            *n
        } else {
            1
        };
        (state.config.clone(), repeats)
    };

    let level = MessageLevel::from_vk(message_severity);
    if config.enable_stats {
        COUNTS[level as usize].fetch_add(1, Ordering::Relaxed);
    }
    let category = message_type_label(message_type);

    match &config.output {
        DebugOutput::Console => {
            eprint!("{}", format_console_message(level, category, message_id, message, repeats));
        }
        DebugOutput::File(path) => {
            append_to_file(path, &format_plain_message(level, category, message_id, message, repeats));
        }
        DebugOutput::Both(path) => {
            eprint!("{}", format_console_message(level, category, message_id, message, repeats));
            append_to_file(path, &format_plain_message(level, category, message_id, message, repeats));
        }
    }

    if config.break_on_error && level == MessageLevel::Error {
        engine_error!("gpumix::validation", "Aborting on validation error {}: {}", message_id, message);
        std::process::abort();
    }

    vk::FALSE
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
