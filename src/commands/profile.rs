//! Profile command implementation.
//!
//! The profile command:
//! 1. Runs the command and records its output
//! 2. Builds the profile document
//! 3. Serves it once to the profiler

use super::models::ProfileArgs;
use crate::profile::build_profile;
use crate::recorder::record_command;
use crate::server::{display_name, publish};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the profile command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * The command could not be spawned or read
/// * No port could be bound for the profile server
pub fn execute_profile(args: ProfileArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Running command...");
    let events = record_command(&args.command).context("Failed to record command output")?;

    info!("Step 2/3: Building profile from {} lines...", events.len());
    let profile = build_profile(&events);

    info!(
        "Step 3/3: Publishing profile (recorded in {:.2}s)...",
        start_time.elapsed().as_secs_f64()
    );
    publish(
        &profile,
        &display_name(&args.command),
        &args.publish_config(),
    )
    .context("Failed to publish profile")?;

    Ok(())
}

/// Validate profile arguments
///
/// **Public** - called before anything is spawned
pub fn validate_args(args: &ProfileArgs) -> Result<()> {
    let Some(program) = args.command.first() else {
        anyhow::bail!("No command given");
    };

    if program.trim().is_empty() {
        anyhow::bail!("Command name cannot be empty");
    }

    if !args.visualizer_origin.starts_with("http://")
        && !args.visualizer_origin.starts_with("https://")
    {
        anyhow::bail!("Profiler URL must start with http:// or https://");
    }

    if args.bind_host.trim().is_empty() {
        anyhow::bail!("Bind host cannot be empty");
    }

    Ok(())
}
