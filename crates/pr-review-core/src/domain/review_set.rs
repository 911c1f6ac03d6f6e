//! Orchestrator result: exactly one [`AgentReview`] per [`ReviewerKind`].

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::finding::{AgentReview, Issue, ReviewerKind};
use crate::merge::{merge_reviews, MergeConfig};

/// The three reviews of one run, keyed by reviewer kind.
///
/// The fixed fields make a missing or duplicated reviewer unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSet {
    pub security: AgentReview,
    pub performance: AgentReview,
    pub maintainability: AgentReview,
}

impl ReviewSet {
    pub fn get(&self, kind: ReviewerKind) -> &AgentReview {
        match kind {
            ReviewerKind::Security => &self.security,
            ReviewerKind::Performance => &self.performance,
            ReviewerKind::Maintainability => &self.maintainability,
        }
    }

    /// Iterate in [`ReviewerKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ReviewerKind, &AgentReview)> {
        ReviewerKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    /// Total number of issues across all reviewers, before dedup.
    pub fn issue_count(&self) -> usize {
        self.iter().map(|(_, review)| review.issues.len()).sum()
    }

    /// Merge all findings into one ranked, deduplicated list.
    pub fn merged(&self, config: &MergeConfig) -> Vec<Issue> {
        merge_reviews(self.iter().map(|(_, review)| review), config)
    }
}

impl Serialize for ReviewSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ReviewerKind::ALL.len()))?;
        for (kind, review) in self.iter() {
            map.serialize_entry(kind.as_str(), review)?;
        }
        map.end()
    }
}
