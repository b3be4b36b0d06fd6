//! Running the target command and recording its output.
//!
//! This module handles:
//! - Joining the argument vector into a shell command line
//! - Merging stdout/stderr and echoing every line live
//! - Timestamping and ANSI-stripping each non-blank line

pub mod ansi;
pub mod command;

use chrono::{DateTime, Local};

// Re-export main types and functions
pub use ansi::strip_ansi;
pub use command::{record_command, record_stream, shell_join};

/// One recorded, non-blank output line
#[derive(Debug, Clone, PartialEq)]
pub struct LineEvent {
    /// Wall-clock time the line was read
    pub timestamp: DateTime<Local>,

    /// Line text with escapes and the line terminator removed
    pub text: String,
}

impl LineEvent {
    pub fn new(timestamp: DateTime<Local>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// Milliseconds since the Unix epoch, with sub-millisecond precision
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp.timestamp_micros() as f64 / 1000.0
    }
}
