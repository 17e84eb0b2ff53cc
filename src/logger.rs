//! Structured logging with box-drawing output.
//!
//! Output for salatr is a tree drawn with Unicode box characters: a version
//! header, one block per location, indented prayer rows, and a closing
//! marker. Level-prefixed lines (`[WARN]`, `[ERR]`, ...) report problems.
//!
//! Logging can be switched off at runtime. `--json` does this so stdout
//! carries nothing but the JSON document.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

const BRANCH: &str = "┣";
const PIPE: &str = "┃";
const END: &str = "╹";

/// Severity of a prefixed log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Debug details
    Warn, // Approximated or suspicious results
    Err,  // A location or input that failed
}

impl LogLevel {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Log => "[LOG]",
            Self::Warn => "[WARN]",
            Self::Err => "[ERR]",
        }
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable logging for the rest of the process.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    fn emit(line: &str) {
        if Self::is_enabled() {
            println!("{}", line);
        }
    }

    /// Print `message` behind its level prefix.
    pub fn log(level: LogLevel, message: &str) {
        Self::emit(&format!("{} {}", level.prefix(), message));
    }

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Log, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// A top-level line on the trunk of the tree.
    pub fn log_decorated(message: &str) {
        Self::emit(&format!("{} {}", BRANCH, message));
    }

    /// A detail line under the current block.
    pub fn log_indented(message: &str) {
        Self::emit(&indented(message));
    }

    pub fn log_pipe() {
        Self::emit(PIPE);
    }

    /// Open a block, separated from the previous one by an empty pipe.
    ///
    /// Each location's results open with one of these.
    pub fn log_block_start(message: &str) {
        Self::log_pipe();
        Self::log_decorated(message);
    }

    /// One prayer row: name, clock time, and a marker for approximated times.
    pub fn log_prayer(name: &str, clock: &str, approximated: bool) {
        Self::emit(&indented(&prayer_row(name, clock, approximated)));
    }

    /// The header every run starts with.
    pub fn log_version() {
        Self::emit(&format!("┏ salatr v{} ━━╸", env!("CARGO_PKG_VERSION")));
        Self::log_pipe();
    }

    pub fn log_end() {
        Self::emit(END);
    }
}

fn indented(message: &str) -> String {
    format!("{}   {}", PIPE, message)
}

// Names are padded so the clock column lines up for every prayer
fn prayer_row(name: &str, clock: &str, approximated: bool) -> String {
    let marker = if approximated { " *" } else { "" };
    format!("{:<8} {}{}", name, clock, marker)
}
