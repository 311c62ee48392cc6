//! Character-multiset matching for list filtering.

use std::collections::HashMap;

/// Character frequency multiset of a string.
///
/// Built once per query so a recompute over many labels doesn't re-count
/// the query for every candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharCounts {
    counts: HashMap<char, usize>,
}

impl CharCounts {
    /// Count the characters of `s`.
    pub fn new(s: &str) -> Self {
        let mut counts = HashMap::with_capacity(s.len());
        for c in s.chars() {
            *counts.entry(c).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Returns true if the multiset has no characters.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Occurrences of `c`.
    pub fn get(&self, c: char) -> usize {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    /// Check whether every character of `self` occurs at least as often in `label`.
    pub fn fits_in(&self, label: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut remaining = self.counts.clone();
        let mut unmet = remaining.len();
        for c in label.chars() {
            if let Some(n) = remaining.get_mut(&c) {
                if *n > 0 {
                    *n -= 1;
                    if *n == 0 {
                        unmet -= 1;
                        if unmet == 0 {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

/// Does `query`'s character multiset fit inside `label`'s?
///
/// Order-insensitive and case-sensitive: `"lpa"` matches `"apple"`, `"A"`
/// does not. An empty query matches every label.
pub fn matches(query: &str, label: &str) -> bool {
    CharCounts::new(query).fits_in(label)
}
