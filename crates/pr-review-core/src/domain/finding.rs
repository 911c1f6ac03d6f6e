//! Finding model: `Severity`, `ReviewerKind`, `Issue`, `AgentReview`.
//!
//! Both record types use a closed schema: unknown fields are rejected at
//! deserialization time, and [`AgentReview::validate`] enforces the
//! non-empty constraints that serde alone cannot express.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::SchemaError;

/// Issue severity, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Med,
    Low,
}

impl Severity {
    /// All severities in rank order.
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Med, Severity::Low];

    /// Sort rank: lower sorts first (high = 0, med = 1, low = 2).
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Med => 1,
            Severity::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Med => "med",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three fixed review perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerKind {
    Security,
    Performance,
    Maintainability,
}

impl ReviewerKind {
    /// Every reviewer kind, in the order the orchestrator reports them.
    pub const ALL: [ReviewerKind; 3] = [
        ReviewerKind::Security,
        ReviewerKind::Performance,
        ReviewerKind::Maintainability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewerKind::Security => "security",
            ReviewerKind::Performance => "performance",
            ReviewerKind::Maintainability => "maintainability",
        }
    }
}

impl fmt::Display for ReviewerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewerKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownReviewer {
                name: s.to_string(),
            })
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Issue {
    pub severity: Severity,
    /// Path as referenced in the diff.
    pub file: String,
    /// Free-text line range, e.g. `12-18` or `L12-L18`.
    pub lines: String,
    pub title: String,
    pub details: String,
    pub suggestion: String,
}

impl Issue {
    /// Check the non-empty constraints. `path` prefixes the reported field.
    pub fn validate_at(&self, path: &str) -> Result<(), SchemaError> {
        let fields = [
            ("file", &self.file),
            ("lines", &self.lines),
            ("title", &self.title),
            ("details", &self.details),
            ("suggestion", &self.suggestion),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(SchemaError::EmptyField {
                    field: format!("{path}{name}"),
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_at("")
    }
}

/// One reviewer's full output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentReview {
    pub reviewer: ReviewerKind,
    pub summary: String,
    pub issues: Vec<Issue>,
}

impl AgentReview {
    /// Validate the structural constraints and that the document was
    /// produced for `expected`.
    pub fn validate(&self, expected: ReviewerKind) -> Result<(), SchemaError> {
        if self.reviewer != expected {
            return Err(SchemaError::ReviewerMismatch {
                expected,
                actual: self.reviewer,
            });
        }
        if self.summary.is_empty() {
            return Err(SchemaError::EmptyField {
                field: "summary".to_string(),
            });
        }
        for (idx, issue) in self.issues.iter().enumerate() {
            issue.validate_at(&format!("issues[{idx}]."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue {
            severity: Severity::High,
            file: "auth.py".to_string(),
            lines: "10-12".to_string(),
            title: "Hardcoded secret".to_string(),
            details: "API key committed in source".to_string(),
            suggestion: "Load it from the environment".to_string(),
        }
    }

    #[test]
    fn severity_rank_orders_high_first() {
        assert!(Severity::High.rank() < Severity::Med.rank());
        assert!(Severity::Med.rank() < Severity::Low.rank());
    }

    #[test]
    fn reviewer_kind_parses_wire_names() {
        assert_eq!(
            "performance".parse::<ReviewerKind>().unwrap(),
            ReviewerKind::Performance
        );
        assert!(matches!(
            "style".parse::<ReviewerKind>(),
            Err(SchemaError::UnknownReviewer { .. })
        ));
    }

    #[test]
    fn issue_rejects_unknown_fields() {
        let raw = serde_json::json!({
            "severity": "low", "file": "a.rs", "lines": "1", "title": "t",
            "details": "d", "suggestion": "s", "confidence": 0.9
        });
        assert!(serde_json::from_value::<Issue>(raw).is_err());
    }

    #[test]
    fn issue_rejects_unknown_severity() {
        let raw = serde_json::json!({
            "severity": "critical", "file": "a.rs", "lines": "1", "title": "t",
            "details": "d", "suggestion": "s"
        });
        assert!(serde_json::from_value::<Issue>(raw).is_err());
    }

    #[test]
    fn validate_reports_nested_empty_field() {
        let mut bad = issue();
        bad.title.clear();
        let review = AgentReview {
            reviewer: ReviewerKind::Security,
            summary: "One problem".to_string(),
            issues: vec![issue(), bad],
        };
        match review.validate(ReviewerKind::Security).unwrap_err() {
            SchemaError::EmptyField { field } => assert_eq!(field, "issues[1].title"),
            other => panic!("expected EmptyField, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_reviewer_mismatch() {
        let review = AgentReview {
            reviewer: ReviewerKind::Performance,
            summary: "ok".to_string(),
            issues: vec![],
        };
        assert!(matches!(
            review.validate(ReviewerKind::Security),
            Err(SchemaError::ReviewerMismatch { .. })
        ));
    }

    #[test]
    fn validate_accepts_empty_issue_list() {
        let review = AgentReview {
            reviewer: ReviewerKind::Maintainability,
            summary: "Nothing to report".to_string(),
            issues: vec![],
        };
        assert!(review.validate(ReviewerKind::Maintainability).is_ok());
    }
}
