//! Knuth-Morris-Pratt occurrence counting
//!
//! Counts every occurrence of a needle in a haystack, overlapping ones
//! included, in O(H + N) time and O(N) extra space. Both inputs are compared
//! codepoint by codepoint and are expected to be normalized already (see
//! [`crate::search::normalize`]).

/// Longest-proper-prefix-which-is-also-suffix table for one needle.
///
/// Entry `i` is the length of the longest proper prefix of the needle that is
/// also a suffix of `needle[..=i]`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureTable {
    fallback: Vec<usize>,
}

impl FailureTable {
    /// Build the table in a single left-to-right pass.
    pub fn build(needle: &[char]) -> Self {
        let mut fallback = vec![0; needle.len()];
        let mut matched = 0;
        let mut i = 1;

        while i < needle.len() {
            if needle[i] == needle[matched] {
                matched += 1;
                fallback[i] = matched;
                i += 1;
            } else if matched != 0 {
                matched = fallback[matched - 1];
            } else {
                fallback[i] = 0;
                i += 1;
            }
        }

        Self { fallback }
    }

    /// Fallback length after `matched` characters matched and the next one failed
    #[inline]
    pub fn fallback(&self, matched: usize) -> usize {
        self.fallback[matched - 1]
    }

    #[allow(dead_code)]
    pub fn as_slice(&self) -> &[usize] {
        &self.fallback
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.fallback.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fallback.is_empty()
    }
}

/// Matcher for a single needle; owns its failure table.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: Vec<char>,
    table: FailureTable,
}

impl Matcher {
    pub fn new(needle: &str) -> Self {
        let needle: Vec<char> = needle.chars().collect();
        let table = FailureTable::build(&needle);
        Self { needle, table }
    }

    /// Needle length in codepoints
    #[allow(dead_code)]
    pub fn needle_len(&self) -> usize {
        self.needle.len()
    }

    #[allow(dead_code)]
    pub fn table(&self) -> &FailureTable {
        &self.table
    }

    /// Count occurrences of the needle in `haystack`, overlapping ones included.
    pub fn count_in(&self, haystack: &str) -> usize {
        let haystack: Vec<char> = haystack.chars().collect();
        self.count_in_chars(&haystack)
    }

    pub fn count_in_chars(&self, haystack: &[char]) -> usize {
        let n = self.needle.len();
        if n == 0 || haystack.is_empty() || n > haystack.len() {
            return 0;
        }

        let mut count = 0;
        let mut matched = 0;

        for &c in haystack {
            while matched > 0 && c != self.needle[matched] {
                matched = self.table.fallback(matched);
            }
            if c == self.needle[matched] {
                matched += 1;
                if matched == n {
                    count += 1;
                    matched = self.table.fallback(n);
                }
            }
        }

        count
    }
}

/// Count occurrences of `needle` in `haystack`, overlapping ones included.
///
/// Returns 0 for an empty needle, an empty haystack, or a needle longer than
/// the haystack.
///
/// Builds a fresh failure table per call. `tilde count` goes through
/// [`Matcher`] instead so one table serves every input file.
#[allow(dead_code)]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() || haystack.is_empty() {
        return 0;
    }
    Matcher::new(needle).count_in(haystack)
}
