//! Deduplicated string table.
//!
//! The processed profile format stores marker names as indexes into a
//! per-thread `stringArray`. Indexes are handed out in insertion order and
//! never change for the lifetime of the table.

use crate::utils::error::ProfileError;
use log::warn;
use std::collections::HashMap;

/// Append-only bijection between `[0, len)` and a set of unique strings
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from a serialized `stringArray`.
    ///
    /// If the array holds duplicates the first occurrence wins lookups,
    /// but every position stays addressable by index.
    pub fn from_strings(strings: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(strings.len());
        for (i, s) in strings.iter().enumerate() {
            index.entry(s.clone()).or_insert(i);
        }
        Self { strings, index }
    }

    /// Get the index for `s`, adding it if it hasn't been seen yet
    pub fn index_for_string(&mut self, s: &str) -> usize {
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }

    /// Get the string at `index`
    ///
    /// # Errors
    /// * `ProfileError::StringNotFound` - `index >= len()`
    pub fn get_string(&self, index: usize) -> Result<&str, ProfileError> {
        self.strings
            .get(index)
            .map(String::as_str)
            .ok_or(ProfileError::StringNotFound {
                index,
                len: self.strings.len(),
            })
    }

    /// Like `get_string`, but falls back to `default` for a missing index
    pub fn get_string_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        match self.get_string(index) {
            Ok(s) => s,
            Err(e) => {
                warn!("{}", e);
                default
            }
        }
    }

    pub fn has_index(&self, index: usize) -> bool {
        index < self.strings.len()
    }

    pub fn has_string(&self, s: &str) -> bool {
        self.index.contains_key(s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The table in index order, ready to become a thread's `stringArray`
    pub fn serialize_to_array(&self) -> Vec<String> {
        self.strings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_for_string_is_idempotent() {
        let mut table = StringTable::new();
        let first = table.index_for_string("sh-profile");
        let second = table.index_for_string("sh-profile");

        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_indexes_follow_first_seen_order() {
        let mut table = StringTable::new();
        let indexes: Vec<usize> = ["a", "b", "a", "c", "b"]
            .iter()
            .map(|s| table.index_for_string(s))
            .collect();

        assert_eq!(indexes, vec![0, 1, 0, 2, 1]);
        assert_eq!(table.serialize_to_array(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_get_string_out_of_range() {
        let mut table = StringTable::new();
        table.index_for_string("only");

        assert_eq!(table.get_string(0), Ok("only"));
        assert_eq!(
            table.get_string(1),
            Err(ProfileError::StringNotFound { index: 1, len: 1 })
        );
        assert_eq!(table.get_string_or(7, "fallback"), "fallback");
    }

    #[test]
    fn test_lookups_do_not_mutate() {
        let table = StringTable::new();
        assert!(!table.has_string("x"));
        assert!(!table.has_index(0));
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_strings_keeps_first_duplicate() {
        let mut table =
            StringTable::from_strings(vec!["x".to_string(), "y".to_string(), "x".to_string()]);

        assert_eq!(table.index_for_string("x"), 0);
        assert_eq!(table.get_string(2), Ok("x"));
        assert_eq!(table.len(), 3);
    }
}
