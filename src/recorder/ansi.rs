//! ANSI SGR escape stripping.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// ESC [ <n> (; <n>){0,2} m
static SGR_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[\d+(;\d+){0,2}m").expect("SGR pattern is valid"));

/// Remove color/style escape sequences from `s`.
///
/// Borrows when there is nothing to strip.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    SGR_SEQUENCE.replace_all(s, "")
}
