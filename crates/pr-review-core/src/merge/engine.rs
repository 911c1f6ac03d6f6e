//! Flatten, rank, group and deduplicate findings from several reviewers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::finding::{AgentReview, Issue};
use crate::merge::range::LineRange;
use crate::merge::similarity::{titles_similar, DEFAULT_SIMILARITY_THRESHOLD};
use crate::obs::emit_review_merged;

/// Tunables for the merge engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Title similarity ratio at or above which two findings on overlapping
    /// lines of the same file are treated as duplicates.
    pub similarity_threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Sort key: (severity rank, file path, range start).
fn sort_key(issue: &Issue) -> (u8, &str, u64) {
    (
        issue.severity.rank(),
        issue.file.as_str(),
        LineRange::parse(&issue.lines).start,
    )
}

fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

/// Whether `candidate` duplicates `kept`. Both must be in the same file.
fn is_duplicate(candidate: &Issue, kept: &Issue, config: &MergeConfig) -> bool {
    LineRange::parse(&candidate.lines).overlaps(&LineRange::parse(&kept.lines))
        && titles_similar(&candidate.title, &kept.title, config.similarity_threshold)
}

/// Merge a flat list of findings.
///
/// Issues are sorted by (severity rank, file, range start) and grouped by
/// file. Within a file, a candidate is dropped when an already-kept issue
/// has an overlapping range and a similar title. Because candidates are
/// visited in rank order, the survivor of a duplicate pair always has the
/// higher (or equal) severity. The kept set is sorted again before return.
pub fn merge_issues<I>(issues: I, config: &MergeConfig) -> Vec<Issue>
where
    I: IntoIterator<Item = Issue>,
{
    let mut all: Vec<Issue> = issues.into_iter().collect();
    if all.is_empty() {
        return Vec::new();
    }
    let input_len = all.len();
    sort_issues(&mut all);

    let mut by_file: BTreeMap<String, Vec<Issue>> = BTreeMap::new();
    for issue in all {
        by_file.entry(issue.file.clone()).or_default().push(issue);
    }

    let mut kept: Vec<Issue> = Vec::with_capacity(input_len);
    for (file, candidates) in by_file {
        let mut kept_in_file: Vec<Issue> = Vec::new();
        for candidate in candidates {
            if let Some(existing) = kept_in_file
                .iter()
                .find(|k| is_duplicate(&candidate, k, config))
            {
                debug!(
                    file = %file,
                    dropped = %candidate.title,
                    kept = %existing.title,
                    "dropping duplicate finding"
                );
                continue;
            }
            kept_in_file.push(candidate);
        }
        kept.extend(kept_in_file);
    }

    sort_issues(&mut kept);
    emit_review_merged(input_len, kept.len());
    kept
}

/// Merge the findings of several agent reviews.
pub fn merge_reviews<'a, I>(reviews: I, config: &MergeConfig) -> Vec<Issue>
where
    I: IntoIterator<Item = &'a AgentReview>,
{
    merge_issues(
        reviews
            .into_iter()
            .flat_map(|review| review.issues.iter().cloned()),
        config,
    )
}
