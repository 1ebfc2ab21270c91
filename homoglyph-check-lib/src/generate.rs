//! Look-alike candidate generation.
//!
//! A base domain such as `apple.com` is split into a local part (`apple`)
//! and a fixed-length suffix (`.com`). Every character of the local part is
//! replaced by each member of its confusable set, and the suffix is appended
//! to every combination.
//!
//! # Examples
//!
//! ```
//! use homoglyph_check_lib::{expand, ConfusableMap};
//!
//! let map = ConfusableMap::from_entries([("a", vec!["a", "4"])]).unwrap();
//! let names: Vec<String> = expand("aa.com", &map).collect();
//! assert_eq!(names, vec!["aa.com", "a4.com", "4a.com", "44.com"]);
//! ```

use crate::confusables::ConfusableMap;

/// Number of trailing characters treated as the top-level suffix (".com").
pub const SUFFIX_LEN: usize = 4;

/// Split `domain` into its local part and its `SUFFIX_LEN`-character suffix.
///
/// Lengths are counted in characters, not bytes. A domain shorter than the
/// suffix has an empty local part.
pub fn split_suffix(domain: &str) -> (&str, &str) {
    let char_count = domain.chars().count();
    let local_chars = char_count.saturating_sub(SUFFIX_LEN);
    let split_at = domain
        .char_indices()
        .nth(local_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(domain.len());
    domain.split_at(split_at)
}

/// Lazy iterator over every look-alike variant of a base domain.
///
/// Iteration is odometer-style: each position of the local part is a digit
/// whose radix is the size of its confusable set, and the rightmost position
/// turns fastest.
#[derive(Debug, Clone)]
pub struct Candidates {
    options: Vec<Vec<char>>,
    counters: Vec<usize>,
    suffix: String,
    done: bool,
}

impl Candidates {
    fn new(base_domain: &str, map: &ConfusableMap) -> Self {
        let (local, suffix) = split_suffix(base_domain);
        let options: Vec<Vec<char>> = local.chars().map(|ch| map.substitutes(ch)).collect();
        let counters = vec![0usize; options.len()];

        Self {
            options,
            counters,
            suffix: suffix.to_string(),
            done: false,
        }
    }

    /// Total number of candidates, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.options
            .iter()
            .fold(1usize, |count, set| count.saturating_mul(set.len()))
    }

    fn current(&self) -> String {
        let mut name: String = self
            .counters
            .iter()
            .enumerate()
            .map(|(i, &c)| self.options[i][c])
            .collect();
        name.push_str(&self.suffix);
        name
    }

    /// Advance the odometer; returns false once every position has wrapped.
    fn advance(&mut self) -> bool {
        for i in (0..self.counters.len()).rev() {
            self.counters[i] += 1;
            if self.counters[i] < self.options[i].len() {
                return true;
            }
            self.counters[i] = 0;
        }
        false
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let name = self.current();
        if !self.advance() {
            self.done = true;
        }
        Some(name)
    }
}

/// Expand `base_domain` into all of its look-alike variants.
///
/// Characters without an entry in `map` are kept as-is. The sequence is
/// finite, deterministic and contains `base_domain` exactly once.
pub fn expand(base_domain: &str, map: &ConfusableMap) -> Candidates {
    Candidates::new(base_domain, map)
}

/// Number of candidates `expand` will produce, without generating them.
pub fn estimate_candidate_count(base_domain: &str, map: &ConfusableMap) -> usize {
    expand(base_domain, map).total()
}
