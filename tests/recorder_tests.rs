#![cfg(unix)]

use sh_profile::recorder::{record_command, shell_join, strip_ansi};
use std::io::Write;

fn cmd(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_records_each_nonblank_line() {
    let events = record_command(&cmd(&["printf", r"one\n\ntwo\n   \nthree\n"])).unwrap();
    let lines: Vec<_> = events.iter().map(|e| e.text.as_str()).collect();

    assert_eq!(lines, vec!["one", "two", "three"]);
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_stderr_is_merged() {
    let script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script.as_file(), "echo out\necho err >&2\necho out2").unwrap();

    let path = script.path().to_str().unwrap();
    let events = record_command(&cmd(&["sh", path])).unwrap();
    let lines: Vec<_> = events.iter().map(|e| e.text.as_str()).collect();

    assert_eq!(lines, vec!["out", "err", "out2"]);
}

#[test]
fn test_failing_command_still_records() {
    let events = record_command(&cmd(&["sh", "-c", "echo partial; exit 3"])).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text, "partial");
}

#[test]
fn test_arguments_are_not_reinterpreted_by_shell() {
    let events = record_command(&cmd(&["echo", "$HOME", "a  b", "it's"])).unwrap();

    assert_eq!(events[0].text, "$HOME a  b it's");
}

#[test]
fn test_color_codes_are_stripped() {
    let events = record_command(&cmd(&["printf", r"\033[31mHELLO\033[0m\n"])).unwrap();

    assert_eq!(events[0].text, "HELLO");
    assert_eq!(strip_ansi(&events[0].text), "HELLO");
}

#[test]
fn test_missing_program_is_reported_through_merged_stream() {
    // sh reports the missing program on stderr, which is merged in
    let events = record_command(&cmd(&["definitely-not-a-real-program-xyz"])).unwrap();

    assert_eq!(events.len(), 1);
    assert!(events[0].text.contains("definitely-not-a-real-program-xyz"));
}

#[test]
fn test_shell_join_quotes_specials() {
    assert_eq!(shell_join(&["echo", "hi"]), "echo hi");
    assert_eq!(shell_join(&["ls", "my dir"]), "ls 'my dir'");
}
