//! Fuzzy title similarity used for duplicate detection.
//!
//! The ratio is `2 * LCS(a, b) / (|a| + |b|)` where LCS is the longest
//! common subsequence over Unicode scalar values. Two empty strings are
//! identical (ratio 1.0).

/// Default threshold at or above which two titles are considered similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Character-level similarity in `[0.0, 1.0]`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Equal after case-folding and trimming, or raw ratio `>= threshold`.
pub fn titles_similar(a: &str, b: &str, threshold: f64) -> bool {
    normalize(a) == normalize(b) || similarity_ratio(a, b) >= threshold
}
