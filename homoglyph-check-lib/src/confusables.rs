//! Confusable-character map.
//!
//! Maps a character to the ordered set of characters that look like it.
//! The map is loaded once from the `similar_chars` table of the config file
//! and is read-only afterwards.

use crate::error::HomoglyphError;
use std::collections::HashMap;

/// Per-character substitute sets.
///
/// Every stored set starts with its own key and holds no duplicates, so
/// expanding a domain always yields the original exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusableMap {
    sets: HashMap<char, Vec<char>>,
}

impl ConfusableMap {
    /// Build a map from raw `similar_chars` entries.
    ///
    /// Keys and substitutes must be single characters and no set may be
    /// empty. Duplicate substitutes are dropped (first occurrence wins) and a
    /// key missing from its own set is inserted at the front.
    pub fn from_entries<I, K, V, S>(entries: I) -> Result<Self, HomoglyphError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sets = HashMap::new();

        for (key, substitutes) in entries {
            let key_str = key.as_ref();
            let key = single_char(key_str).ok_or_else(|| {
                HomoglyphError::config(format!(
                    "similar_chars key '{}' must be exactly one character",
                    key_str
                ))
            })?;

            let mut set: Vec<char> = Vec::new();
            for substitute in substitutes {
                let substitute = substitute.as_ref();
                let ch = single_char(substitute).ok_or_else(|| {
                    HomoglyphError::config(format!(
                        "substitute '{}' for '{}' must be exactly one character",
                        substitute, key
                    ))
                })?;
                if !set.contains(&ch) {
                    set.push(ch);
                }
            }

            if set.is_empty() {
                return Err(HomoglyphError::config(format!(
                    "substitute list for '{}' cannot be empty",
                    key
                )));
            }

            if !set.contains(&key) {
                set.insert(0, key);
            }

            sets.insert(key, set);
        }

        Ok(Self { sets })
    }

    /// Substitute set for `ch`, or `None` when the character has no entry.
    pub fn get(&self, ch: char) -> Option<&[char]> {
        self.sets.get(&ch).map(Vec::as_slice)
    }

    /// Substitute set for `ch`, falling back to the character itself.
    pub fn substitutes(&self, ch: char) -> Vec<char> {
        self.get(ch).map(<[char]>::to_vec).unwrap_or_else(|| vec![ch])
    }

    /// Number of characters with an entry.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
