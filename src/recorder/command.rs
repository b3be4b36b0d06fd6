//! Spawning the target command and reading its merged output.

use super::ansi::strip_ansi;
use super::LineEvent;
use crate::utils::error::RecordError;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::borrow::Cow;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Command, Stdio};

/// Run `command` through the shell and record its output.
///
/// **Public** - main entry point for recording
///
/// stdout and stderr are merged into one stream. Each line is echoed to our
/// stdout as it arrives. The exit status is logged and otherwise ignored,
/// so a failing command still yields a profile.
///
/// # Errors
/// * `RecordError::Spawn` - the shell could not be started
/// * `RecordError::NoOutputStream` - no stdout pipe was attached
/// * `RecordError::Read` / `RecordError::Wait` - I/O failure on the child
pub fn record_command(command: &[String]) -> Result<Vec<LineEvent>, RecordError> {
    let command_line = command_line(command);
    info!("Running: {}", command_line);

    let mut child = shell_command(&command_line)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| RecordError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    let output = child.stdout.take().ok_or(RecordError::NoOutputStream)?;

    let stdout = io::stdout();
    let events = record_stream(BufReader::new(output), stdout.lock(), Local::now)?;

    let status = child.wait().map_err(RecordError::Wait)?;
    if status.success() {
        debug!("Command exited with {}", status);
    } else {
        warn!("Command exited with {}", status);
    }

    info!("Recorded {} lines", events.len());
    Ok(events)
}

/// Read `reader` to EOF, echoing every line to `echo` and recording the
/// non-blank ones with a timestamp taken from `now`.
///
/// Non-UTF-8 bytes are replaced rather than treated as an error.
pub fn record_stream<R, W, C>(
    mut reader: R,
    mut echo: W,
    mut now: C,
) -> Result<Vec<LineEvent>, RecordError>
where
    R: BufRead,
    W: Write,
    C: FnMut() -> DateTime<Local>,
{
    let mut events = Vec::new();
    let mut buf = Vec::new();
    let mut echo_ok = true;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(RecordError::Read)?;
        if read == 0 {
            break;
        }

        let raw = String::from_utf8_lossy(&buf);
        let line = trim_line_terminator(&raw);

        if echo_ok {
            if let Err(e) = writeln!(echo, "{}", line).and_then(|_| echo.flush()) {
                warn!("Stopped echoing command output: {}", e);
                echo_ok = false;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        events.push(LineEvent::new(now(), strip_ansi(line)));
    }

    Ok(events)
}

fn trim_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Join arguments into a single POSIX shell command line, quoting as needed
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| shell_quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> Cow<'_, str> {
    if arg.is_empty() {
        return Cow::Borrowed("''");
    }
    let safe = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r#"'"'"'"#)))
    }
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(format!("exec 2>&1\n{}", command_line));
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    // `/S` strips exactly the outer pair of quotes and keeps the rest verbatim
    let mut cmd = Command::new("cmd");
    cmd.args(["/S", "/C"])
        .raw_arg(format!("\"{} 2>&1\"", command_line));
    cmd
}

#[cfg(not(windows))]
fn command_line(args: &[String]) -> String {
    shell_join(args)
}

#[cfg(windows)]
fn command_line(args: &[String]) -> String {
    cmd_join(args)
}

/// Join arguments for `cmd.exe`, quoting the way the C runtime splits them
#[cfg(any(windows, test))]
fn cmd_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| cmd_quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(any(windows, test))]
fn cmd_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@+=:,./_-\\".contains(c));
    if safe {
        return Cow::Borrowed(arg);
    }

    // Backslashes are only special right before a quote
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat('\\').take(backslashes + 1));
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
        quoted.push(c);
    }
    quoted.extend(std::iter::repeat('\\').take(backslashes));
    quoted.push('"');
    Cow::Owned(quoted)
}
