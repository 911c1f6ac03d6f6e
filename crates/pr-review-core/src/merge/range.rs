//! Lenient line-range extraction from the free-text `lines` field.

use std::sync::OnceLock;

use regex::Regex;

/// Inclusive 1-based line range. `0..=0` means "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineRange {
    pub start: u64,
    pub end: u64,
}

fn digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("static regex is valid"))
}

impl LineRange {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Extract the first two decimal integers, in order.
    ///
    /// `"12-18"` and `"L12-L18"` both yield `12..=18`; a single number is a
    /// one-line range; no digits at all yields `0..=0`. Only ASCII `0-9`
    /// count as digits, so fullwidth or other script numerals are skipped.
    /// Numbers too large for `u64` saturate.
    pub fn parse(lines: &str) -> Self {
        let mut nums = digits()
            .find_iter(lines)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX));
        match nums.next() {
            None => Self::new(0, 0),
            Some(start) => Self::new(start, nums.next().unwrap_or(start)),
        }
    }

    /// Closed-interval overlap; touching endpoints count.
    pub fn overlaps(&self, other: &LineRange) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}
