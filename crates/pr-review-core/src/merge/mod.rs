//! Merge engine: one ranked, deduplicated finding list from many reviewers.
//!
//! # Module layout
//!
//! - [`range`]: `LineRange` parsing and overlap
//! - [`similarity`]: LCS-based title similarity
//! - [`engine`]: `merge_issues`, `merge_reviews`, `MergeConfig`

pub mod engine;
pub mod range;
pub mod similarity;

pub use engine::{merge_issues, merge_reviews, MergeConfig};
pub use range::LineRange;
pub use similarity::{similarity_ratio, titles_similar, DEFAULT_SIMILARITY_THRESHOLD};
