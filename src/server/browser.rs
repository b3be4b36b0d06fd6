//! Best-effort browser launch.

use log::{debug, warn};
use std::process::{Command, Stdio};

/// Ask the OS to open `url` in the default browser.
///
/// Returns whether the opener could be started. The opener is not waited
/// on, and a `false` here is never fatal.
pub fn open_in_browser(url: &str) -> bool {
    launch_detached(opener_command(url)).is_some()
}

/// Spawn `cmd` with null stdio and return its pid.
///
/// The child is dropped unreaped; an opener that outlives it stays a zombie
/// until we exit.
fn launch_detached(mut cmd: Command) -> Option<u32> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match cmd.spawn() {
        Ok(child) => {
            debug!(
                "Opened browser with {:?} (pid {}, not waited on)",
                cmd.get_program(),
                child.id()
            );
            Some(child.id())
        }
        Err(e) => {
            warn!("Could not open a browser ({:?}): {}", cmd.get_program(), e);
            None
        }
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(windows)]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
