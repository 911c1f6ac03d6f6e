use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::finding::{Issue, Severity};

/// File name of the merged JSON report inside the output directory.
pub const REVIEW_JSON_FILE: &str = "review.json";
/// File name of the Markdown report inside the output directory.
pub const REVIEW_MD_FILE: &str = "review.md";

const TOP_ISSUES: usize = 3;

const CHECKLIST: [&str; 4] = [
    "- [ ] Fix high-severity security issues",
    "- [ ] Add validation / error handling",
    "- [ ] Add pagination / batching",
    "- [ ] Add tests",
];

/// Number of merged issues per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub med: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::High => counts.high += 1,
                Severity::Med => counts.med += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.med + self.low
    }
}

impl fmt::Display for SeverityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} high | #{} med | #{} low",
            self.high, self.med, self.low
        )
    }
}

fn one_line(issue: &Issue) -> String {
    format!(
        "- **{}** `{}:{}` - {}",
        issue.severity, issue.file, issue.lines, issue.title
    )
}

/// Render merged issues as a short Markdown report.
///
/// `issues` is expected in merge order (severity first), so the top section
/// simply takes the first three.
pub fn render_markdown(issues: &[Issue]) -> String {
    let mut lines: Vec<String> = vec![
        "## AI PR Review".to_string(),
        String::new(),
        "### Top Issues (top 3 by severity)".to_string(),
        String::new(),
    ];

    if issues.is_empty() {
        lines.push("*No issues reported.*".to_string());
    } else {
        for issue in issues.iter().take(TOP_ISSUES) {
            lines.push(one_line(issue));
            lines.push(format!("  - *Suggestion:* {}", issue.suggestion));
            lines.push(String::new());
        }
    }
    lines.push(String::new());

    lines.push("### Findings by File".to_string());
    lines.push(String::new());
    let mut by_file: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        by_file.entry(issue.file.as_str()).or_default().push(issue);
    }
    for (file, file_issues) in by_file {
        lines.push(format!("**{}**", file));
        lines.extend(file_issues.into_iter().map(one_line));
        lines.push(String::new());
    }
    lines.push(String::new());

    lines.push("### Suggested Checklist".to_string());
    lines.push(String::new());
    lines.extend(CHECKLIST.iter().map(|item| item.to_string()));

    lines.join("\n").trim().to_string()
}

/// Write the merged issues as a pretty JSON array.
pub fn write_review_json(path: &Path, issues: &[Issue]) -> Result<()> {
    let content = serde_json::to_string_pretty(issues).context("serialize merged issues")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Write the Markdown report.
pub fn write_review_md(path: &Path, issues: &[Issue]) -> Result<()> {
    let md = render_markdown(issues);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
