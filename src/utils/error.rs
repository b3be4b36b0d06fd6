//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while running and recording the target command
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to spawn command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command produced no readable output stream")]
    NoOutputStream,

    #[error("Failed to read command output: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to wait for command exit: {0}")]
    Wait(#[source] std::io::Error),
}

/// Lookups into profile tables that fell outside the table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("String index {index} not in string table (size {len})")]
    StringNotFound { index: usize, len: usize },

    #[error("Thread index {index} not in profile (size {len})")]
    ThreadNotFound { index: usize, len: usize },

    #[error("Marker column `{column}` has {len} entries, table length is {expected}")]
    MarkerColumnMismatch {
        column: &'static str,
        len: usize,
        expected: usize,
    },
}

/// Errors that can occur while publishing a profile
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to bind {host}: {source}")]
    Bind {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read bound address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("Failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),
}
