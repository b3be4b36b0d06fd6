//! sh-profile
//!
//! Run a command, timestamp every line it prints, and open the result as
//! a marker timeline in the Firefox Profiler.
//!
//! This crate provides the implementation for the `sh-profile` CLI tool:
//!
//! - [`recorder`] runs the command and records `(timestamp, line)` pairs
//! - [`profile`] turns those into a processed-profile document
//! - [`server`] hands the document to the profiler over a one-shot local server
//!
//! ## Getting Started
//!
//! ```bash
//! sh-profile -- brew upgrade
//! ```

pub mod commands;
pub mod profile;
pub mod recorder;
pub mod server;
pub mod utils;
